/// Terminal front end: mesh loading, orbit camera, ASCII rasterizer and the
/// interactive rotation viewer
use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        MouseButton, MouseEvent, MouseEventKind,
    },
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self, ClearType},
};
use log::{debug, info};
use quatview_core::{draw_frame, Error, Session, Vec3};
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};

pub mod camera;
pub mod loader;
pub mod renderer;

pub use camera::{Camera, ProjectionMode};
pub use loader::{load_mesh, LoadError};
pub use renderer::AsciiRenderer;

/// Axis components move by this much per key press.
const AXIS_STEP: f64 = 0.1;
/// Degrees per `[` / `]` press.
const ANGLE_STEP: f64 = 5.0;

const HELP: &str = "xyz/XYZ axis  [ ] angle  Enter apply  r reset  1-5 layers  p proj  h help  q quit";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AppOptions {
    pub fps: u32,
    pub projection: ProjectionMode,
}

impl Default for AppOptions {
    fn default() -> Self {
        Self {
            fps: 30,
            projection: ProjectionMode::Perspective,
        }
    }
}

/// Main application struct for the interactive viewer
pub struct TerminalApp {
    session: Session,
    camera: Camera,
    renderer: AsciiRenderer,
    axis_input: Vec3,
    angle_input: f64,
    object_name: String,
    status: String,
    drag_from: Option<(u16, u16)>,
    options: AppOptions,
    running: bool,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    pub fn new(session: Session, options: AppOptions) -> io::Result<Self> {
        let (width, height) = terminal::size()?;
        Ok(Self::with_size(session, options, width, height))
    }

    /// Build the app for a fixed screen size without touching the terminal.
    pub fn with_size(session: Session, options: AppOptions, width: u16, height: u16) -> Self {
        let params = *session.params();
        let mut camera = Camera::new(width as u32, height as u32);
        camera.mode = options.projection;

        let mut app = Self {
            session,
            camera,
            renderer: AsciiRenderer::new(width as usize, height as usize),
            axis_input: params.axis,
            angle_input: params.angle_degrees,
            object_name: "mesh".to_string(),
            status: HELP.to_string(),
            drag_from: None,
            options,
            running: true,
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        };
        app.announce_object();
        app
    }

    /// Name shown for the loaded mesh, usually its file name.
    pub fn set_object_name(&mut self, name: impl Into<String>) {
        self.object_name = name.into();
        self.announce_object();
    }

    fn announce_object(&mut self) {
        if let Some(info) = self.object_info() {
            self.status = format!("Successfully loaded {}", info);
        }
    }

    /// `name: N vertices, M faces` for the loaded mesh.
    pub fn object_info(&self) -> Option<String> {
        self.session.mesh().map(|mesh| {
            format!(
                "{}: {} vertices, {} faces",
                self.object_name,
                mesh.vertex_count(),
                mesh.face_count()
            )
        })
    }

    pub fn header(&self) -> String {
        let object = self.object_info().unwrap_or_else(|| "no object".to_string());
        format!(
            "Quatview | {} | axis {:.1} angle {:.0}° | FPS: {:.1}",
            object, self.axis_input, self.angle_input, self.fps
        )
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn axis_input(&self) -> Vec3 {
        self.axis_input
    }

    pub fn angle_input(&self) -> f64 {
        self.angle_input
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide, EnableMouseCapture)?;

        let result = self.main_loop();

        // Cleanup
        execute!(stdout(), DisableMouseCapture, terminal::LeaveAlternateScreen, cursor::Show)?;
        terminal::disable_raw_mode()?;

        result
    }

    fn main_loop(&mut self) -> io::Result<()> {
        let target_frame_time = Duration::from_millis(1000 / u64::from(self.options.fps.max(1)));

        while self.running {
            let frame_start = Instant::now();

            while event::poll(Duration::from_millis(0))? {
                self.handle_event(event::read()?);
            }

            self.render()?;

            // Frame timing
            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < target_frame_time {
                std::thread::sleep(target_frame_time - elapsed);
            }

            // Update FPS counter
            let now = Instant::now();
            if (now - self.last_frame).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_frame).as_secs_f32();
                self.frame_count = 0;
                self.last_frame = now;
            }
        }

        Ok(())
    }

    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(KeyEvent {
                code,
                kind: KeyEventKind::Press,
                ..
            }) => self.handle_key(code),
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            Event::Resize(width, height) => self.resize(width, height),
            _ => {}
        }
    }

    pub fn handle_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.running = false;
            }
            KeyCode::Char('w') | KeyCode::Up => self.camera.drag(0.0, -10.0),
            KeyCode::Char('s') | KeyCode::Down => self.camera.drag(0.0, 10.0),
            KeyCode::Char('a') | KeyCode::Left => self.camera.drag(-10.0, 0.0),
            KeyCode::Char('d') | KeyCode::Right => self.camera.drag(10.0, 0.0),
            KeyCode::Char('+') | KeyCode::Char('=') => self.camera.zoom(-1),
            KeyCode::Char('-') => self.camera.zoom(1),
            KeyCode::Char('x') => self.nudge_axis(Vec3::X),
            KeyCode::Char('y') => self.nudge_axis(Vec3::Y),
            KeyCode::Char('z') => self.nudge_axis(Vec3::Z),
            KeyCode::Char('X') => self.nudge_axis(-Vec3::X),
            KeyCode::Char('Y') => self.nudge_axis(-Vec3::Y),
            KeyCode::Char('Z') => self.nudge_axis(-Vec3::Z),
            KeyCode::Char('[') => self.nudge_angle(-ANGLE_STEP),
            KeyCode::Char(']') => self.nudge_angle(ANGLE_STEP),
            KeyCode::Enter | KeyCode::Char(' ') => self.apply_rotation(),
            KeyCode::Char('r') => self.reset(),
            KeyCode::Char('h') | KeyCode::Char('?') => self.status = HELP.to_string(),
            KeyCode::Char('p') => {
                self.camera.mode = self.camera.mode.toggled();
                self.status = format!("Projection: {:?}", self.camera.mode);
            }
            KeyCode::Char(c @ '1'..='5') => self.toggle_layer(c),
            _ => {}
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.drag_from = Some((mouse.column, mouse.row));
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                if let Some((column, row)) = self.drag_from {
                    let dx = mouse.column as f32 - column as f32;
                    let dy = mouse.row as f32 - row as f32;
                    // Rows are about twice as tall as columns are wide
                    self.camera.drag(dx, dy * 2.0);
                }
                self.drag_from = Some((mouse.column, mouse.row));
            }
            MouseEventKind::Up(_) => self.drag_from = None,
            MouseEventKind::ScrollUp => self.camera.zoom(-1),
            MouseEventKind::ScrollDown => self.camera.zoom(1),
            _ => {}
        }
    }

    fn resize(&mut self, width: u16, height: u16) {
        debug!("terminal resized to {}x{}", width, height);
        self.camera.resize(width as u32, height as u32);
        self.renderer.resize(width as usize, height as usize);
    }

    /// Move the pending axis one step along `direction` and preview it.
    fn nudge_axis(&mut self, direction: Vec3) {
        let moved = self.axis_input + direction * AXIS_STEP;
        // Keep the inputs on the 0.1 grid so repeated steps land on zero
        self.axis_input = Vec3::new(
            round_to_step(moved.x),
            round_to_step(moved.y),
            round_to_step(moved.z),
        );
        self.preview();
    }

    fn nudge_angle(&mut self, delta: f64) {
        self.angle_input += delta;
        self.preview();
    }

    fn preview(&mut self) {
        self.session.set_rotation_params(self.axis_input, self.angle_input);
    }

    fn apply_rotation(&mut self) {
        let applied = self.session.rotate(self.axis_input, self.angle_input).map(|_| ());
        match applied {
            Ok(()) => {
                self.status = format!("Applied rotation: {}", self.session.params());
            }
            Err(Error::DegenerateAxis { .. }) => {
                self.status = "Invalid axis: cannot be zero vector".to_string();
            }
            Err(err) => {
                self.status = err.to_string();
            }
        }
    }

    fn reset(&mut self) {
        self.session.reset();
        self.camera.reset();
        let params = *self.session.params();
        self.axis_input = params.axis;
        self.angle_input = params.angle_degrees;
        self.status = "Reset".to_string();
        info!("view reset");
    }

    fn toggle_layer(&mut self, key: char) {
        let config = self.session.config_mut();
        let (name, shown) = match key {
            '1' => {
                config.overlay.show_axes = !config.overlay.show_axes;
                config.overlay.show_axis_labels = config.overlay.show_axes;
                ("axes", config.overlay.show_axes)
            }
            '2' => {
                config.overlay.show_rotation_axis = !config.overlay.show_rotation_axis;
                ("rotation axis", config.overlay.show_rotation_axis)
            }
            '3' => {
                config.overlay.show_angle_label = !config.overlay.show_angle_label;
                ("angle label", config.overlay.show_angle_label)
            }
            '4' => {
                config.visibility.show_original = !config.visibility.show_original;
                ("original mesh", config.visibility.show_original)
            }
            '5' => {
                config.visibility.show_rotated = !config.visibility.show_rotated;
                ("rotated mesh", config.visibility.show_rotated)
            }
            _ => return,
        };
        self.status = format!("{}: {}", name, if shown { "on" } else { "off" });
    }

    /// Rasterize one frame into the renderer's buffers.
    pub fn compose(&mut self) {
        self.renderer.begin_frame(&self.camera);
        draw_frame(&mut self.renderer, &self.session);
    }

    pub fn renderer(&self) -> &AsciiRenderer {
        &self.renderer
    }

    fn render(&mut self) -> io::Result<()> {
        self.compose();

        let mut stdout = stdout();
        queue!(stdout, cursor::MoveTo(0, 0))?;
        self.renderer.draw(&mut stdout)?;

        let header = self.header();
        let last_row = (self.renderer.height() as u16).saturating_sub(1);
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(header),
            terminal::Clear(ClearType::UntilNewLine),
            cursor::MoveTo(0, last_row),
            SetForegroundColor(Color::White),
            Print(&self.status),
            terminal::Clear(ClearType::UntilNewLine),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}

fn round_to_step(value: f64) -> f64 {
    (value / AXIS_STEP).round() * AXIS_STEP
}
