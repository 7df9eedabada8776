/// Quatview - interactive quaternion rotation viewer
///
/// Controls:
///   - x/y/z, X/Y/Z: Nudge the rotation axis
///   - [ / ]: Change the angle by 5 degrees
///   - Enter/Space: Apply the rotation
///   - WASD / Arrow Keys / mouse drag: Orbit the camera
///   - R: Reset, P: Toggle projection, 1-5: Toggle layers
///   - Q/ESC: Quit
mod cli;

use anyhow::Context;
use clap::Parser;
use cli::Cli;
use log::{info, LevelFilter};
use quatview_core::{Mesh, Session};
use quatview_terminal::{load_mesh, AppOptions, ProjectionMode, TerminalApp};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(if cli.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Warn
        })
        .parse_default_env()
        .init();

    let (mesh, name) = match &cli.mesh {
        Some(path) => {
            let mesh = load_mesh(path).with_context(|| format!("loading {}", path.display()))?;
            let name = path
                .file_name()
                .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
            (mesh, name)
        }
        None => {
            info!("no mesh given, showing a cube");
            (Mesh::cube(2.0), "cube".to_string())
        }
    };

    let mut session = Session::new(cli.viewer_config());
    session.load_mesh(mesh);
    if cli.apply {
        session
            .rotate(cli.axis, cli.angle)
            .context("applying the startup rotation")?;
    } else {
        session.set_rotation_params(cli.axis, cli.angle);
    }

    let options = AppOptions {
        fps: cli.fps,
        projection: if cli.orthographic {
            ProjectionMode::Orthographic
        } else {
            ProjectionMode::Perspective
        },
    };

    let mut app = TerminalApp::new(session, options).context("querying the terminal size")?;
    app.set_object_name(name);
    app.run().context("running the viewer")?;
    Ok(())
}
