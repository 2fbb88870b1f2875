//! Geometric primitives in one scene
//!
//! Keys: `o` toggles the plane opacity, `s` shows or hides the sphere.

use anyhow::Result;
use clap::Parser;
use log::info;
use ptviz::prelude::*;

#[derive(Parser)]
struct CommandLine {
    /// Build the scene without opening a window
    #[clap(long)]
    headless: bool,
    /// Length of the coordinate axes
    #[clap(long, default_value = "10.0")]
    axes: f32,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = CommandLine::parse();

    let mut session = Session::create(ViewerConfig {
        title: "ptviz primitives".to_string(),
        ..ViewerConfig::default()
    });

    let control = session.control()?;
    control.add_box([-10.0, -5.0, -10.0, -5.0, -10.0, 0.0])?;
    let sphere = control.add_sphere(Point3f::new(-10.0, -10.0, 10.0), 5.0)?;
    control.add_cylinder(Point3f::new(10.0, 0.0, 0.0), 2.0, 10.0)?;
    let plane = control.add_plane();
    control.set_actor_color(plane, Rgb::GREEN)?;
    control.set_actor_opacity(plane, 0.5)?;
    control.set_actor_scale(plane, Vector3::new(10.0f32, 10.0, 0.0))?;
    control.add_axes(args.axes)?;
    control.render()?;

    let stats = if args.headless {
        session.shutdown()
    } else {
        let mut viewer = Viewer::new(session);
        viewer.bind_key('o', move |session| {
            let control = session.control()?;
            let opacity = if control.actor_opacity(plane)? < 1.0 { 1.0 } else { 0.5 };
            control.set_actor_opacity(plane, opacity)
        });
        viewer.bind_key('s', move |session| {
            let control = session.control()?;
            let visible = control.actor_visibility(sphere)?;
            control.set_actor_visibility(sphere, !visible)
        });
        viewer.run()?
    };
    info!("{} actors, {} redraws", stats.actors, stats.redraws);
    Ok(())
}
