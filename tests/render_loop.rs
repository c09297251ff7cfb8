use std::cell::{Cell, RefCell};
use std::convert::Infallible;
use std::fs::File;
use std::io;
use std::path::Path;
use std::rc::Rc;
use std::sync::{Arc, Mutex};

use tempfile::{tempdir, TempDir};
use tracing_subscriber::fmt::MakeWriter;

use gl_wrapper::geometry::GBError;
use gl_wrapper::program::{ProgramError, ShaderStage};
use gl_wrapper::status::Checked;

use shader_preview::clock::FrameClock;
use shader_preview::{App, AppError, Backend, PreviewConfig};

const VERT: &str = "#version 330 core\nlayout(location = 0) in vec2 pos;\nvoid main() { gl_Position = vec4(pos, 0.0, 1.0); }\n";
const FRAG: &str = "#version 330 core\nuniform float time;\nout vec4 color;\nvoid main() { color = vec4(sin(time)); }\n";

#[derive(Debug, Clone, PartialEq)]
enum Call {
    CreateProgram { vert: String, frag: String },
    CreateGeometry { vertices: usize, indices: usize },
    SetUniform(&'static str, f32),
    PollEvents,
    Clear,
    Draw,
    ReadPixels(u32, u32),
    Swap,
    DestroyGeometry,
    DestroyProgram,
    Terminate,
}

/// Records every call and asks to close after `frames` swaps.
///
/// The log and surface size are shared so tests can reach them after `terminate` or
/// while the app owns the backend.
struct StubBackend {
    frames: usize,
    swaps: usize,
    size: Rc<Cell<(u32, u32)>>,
    log: Rc<RefCell<Vec<Call>>>,
}

impl StubBackend {
    fn new(frames: usize) -> Self {
        Self {
            frames,
            swaps: 0,
            size: Rc::new(Cell::new((1200, 600))),
            log: Default::default(),
        }
    }

    fn record(&mut self, call: Call) {
        self.log.borrow_mut().push(call);
    }

    fn calls(&self) -> Vec<Call> {
        self.log.borrow().clone()
    }
}

impl Backend for StubBackend {
    type Program = ();
    type Geometry = ();
    type Uniform = &'static str;
    type Error = Infallible;

    fn framebuffer_size(&self) -> (u32, u32) {
        self.size.get()
    }

    fn should_close(&self) -> bool {
        self.swaps >= self.frames
    }

    fn poll_events(&mut self) {
        self.record(Call::PollEvents);
    }

    fn create_program(&mut self, vert: &str, frag: &str) -> Checked<(), ProgramError> {
        self.record(Call::CreateProgram {
            vert: vert.to_string(),
            frag: frag.to_string(),
        });

        let mut checked = Checked::new(());
        for (src, stage) in [(vert, ShaderStage::Vertex), (frag, ShaderStage::Fragment)] {
            if src.is_empty() {
                checked.push(ProgramError::Compilation {
                    stage,
                    log: "0:0(0): error: no main function".into(),
                });
            }
        }
        checked
    }

    fn create_geometry(&mut self, vertices: &[f32], indices: &[u32]) -> Result<(), GBError> {
        self.record(Call::CreateGeometry {
            vertices: vertices.len() / 2,
            indices: indices.len(),
        });
        Ok(())
    }

    fn uniform_location(&self, _program: &(), name: &str) -> &'static str {
        match name {
            "screenWidth" => "screenWidth",
            "screenHeight" => "screenHeight",
            "time" => "time",
            _ => "",
        }
    }

    fn set_uniform(&mut self, _program: &(), uniform: &&'static str, value: f32) {
        self.record(Call::SetUniform(*uniform, value));
    }

    fn clear(&mut self) {
        self.record(Call::Clear);
    }

    fn draw(&mut self, _program: &(), _geometry: &()) {
        self.record(Call::Draw);
    }

    fn read_pixels(&mut self, width: u32, height: u32) -> Vec<u8> {
        self.record(Call::ReadPixels(width, height));
        vec![128; width as usize * height as usize * 3]
    }

    fn swap_buffers(&mut self) -> Result<(), Infallible> {
        self.record(Call::Swap);
        self.swaps += 1;
        Ok(())
    }

    fn destroy_geometry(&mut self, _geometry: ()) {
        self.record(Call::DestroyGeometry);
    }

    fn destroy_program(&mut self, _program: ()) {
        self.record(Call::DestroyProgram);
    }

    fn terminate(mut self) {
        self.record(Call::Terminate);
    }
}

fn shader_dir(vert: Option<&str>, frag: Option<&str>) -> (TempDir, PreviewConfig) {
    let dir = tempdir().unwrap();
    let write = |name: &str, src: Option<&str>| {
        let path = dir.path().join(name);
        if let Some(src) = src {
            std::fs::write(&path, src).unwrap();
        }
        path
    };

    let config = PreviewConfig {
        vertex_path: write("vertex.vert", vert),
        fragment_path: write("fragment.frag", frag),
        ..Default::default()
    };

    (dir, config)
}

fn uniform_writes(frame: &[Call], name: &str) -> Vec<f32> {
    frame
        .iter()
        .filter_map(|c| match c {
            Call::SetUniform(n, v) if *n == name => Some(*v),
            _ => None,
        })
        .collect()
}

fn frames_of(calls: &[Call]) -> Vec<&[Call]> {
    let start = calls
        .iter()
        .position(|c| matches!(c, Call::CreateGeometry { .. }))
        .unwrap()
        + 1;

    calls[start..]
        .split_inclusive(|c| *c == Call::Swap)
        .filter(|f| f.last() == Some(&Call::Swap))
        .collect()
}

fn run_frames(frames: usize, config: &PreviewConfig) -> Vec<Call> {
    let backend = StubBackend::new(frames);
    let log = backend.log.clone();

    App::new(backend, FrameClock::start(), config)
        .unwrap()
        .run()
        .unwrap();

    let calls = log.borrow().clone();
    calls
}

#[test]
fn setup_compiles_sources_and_uploads_quad() {
    let (_dir, config) = shader_dir(Some(VERT), Some(FRAG));
    let app = App::new(StubBackend::new(0), FrameClock::start(), &config).unwrap();

    assert_eq!(
        app.backend().calls(),
        vec![
            Call::CreateProgram {
                vert: VERT.into(),
                frag: FRAG.into()
            },
            Call::CreateGeometry {
                vertices: 4,
                indices: 6
            },
        ]
    );
}

#[test]
fn every_draw_follows_one_write_per_uniform() {
    let (_dir, config) = shader_dir(Some(VERT), Some(FRAG));
    let calls = run_frames(5, &config);
    let frames = frames_of(&calls);

    assert_eq!(frames.len(), 5);
    assert_eq!(calls.iter().filter(|c| **c == Call::Draw).count(), 5);

    for frame in frames {
        assert_eq!(
            frame.iter().filter(|c| **c == Call::Draw).count(),
            1,
            "{frame:?}"
        );
        assert_eq!(uniform_writes(frame, "screenWidth"), vec![1200.0]);
        assert_eq!(uniform_writes(frame, "screenHeight"), vec![600.0]);
        assert_eq!(uniform_writes(frame, "time").len(), 1);
    }
}

#[test]
fn frame_steps_run_in_order() {
    let (_dir, config) = shader_dir(Some(VERT), Some(FRAG));
    let calls = run_frames(1, &config);
    let frame = frames_of(&calls)[0];

    assert!(matches!(
        frame,
        [
            Call::SetUniform("screenWidth", _),
            Call::SetUniform("screenHeight", _),
            Call::PollEvents,
            Call::SetUniform("time", _),
            Call::Clear,
            Call::Draw,
            Call::Swap,
        ]
    ));
}

#[test]
fn time_uniform_never_decreases() {
    let (_dir, config) = shader_dir(Some(VERT), Some(FRAG));
    let calls = run_frames(50, &config);
    let times = uniform_writes(&calls, "time");

    assert_eq!(times.len(), 50);
    assert!(times.windows(2).all(|w| w[0] <= w[1]), "{times:?}");
    assert!(times[0] >= 0.0);
}

#[test]
fn screen_size_is_not_requeried_after_setup() {
    let (_dir, config) = shader_dir(Some(VERT), Some(FRAG));
    let backend = StubBackend::new(3);
    let size = backend.size.clone();
    let mut app = App::new(backend, FrameClock::start(), &config).unwrap();

    app.frame().unwrap();
    size.set((2400, 1200));
    app.frame().unwrap();

    let calls = app.backend().calls();
    assert_eq!(uniform_writes(&calls, "screenWidth"), vec![1200.0, 1200.0]);
    assert_eq!(uniform_writes(&calls, "screenHeight"), vec![600.0, 600.0]);
    assert_eq!(app.frames(), 2);
    app.teardown();
}

#[test]
fn teardown_releases_gpu_objects_before_terminating() {
    let (_dir, config) = shader_dir(Some(VERT), Some(FRAG));
    let calls = run_frames(2, &config);

    assert_eq!(
        &calls[calls.len() - 3..],
        &[Call::DestroyGeometry, Call::DestroyProgram, Call::Terminate]
    );
}

#[test]
fn zero_frames_when_window_closes_immediately() {
    let (_dir, config) = shader_dir(Some(VERT), Some(FRAG));
    let calls = run_frames(0, &config);

    assert!(!calls.contains(&Call::Draw));
    assert_eq!(calls.last(), Some(&Call::Terminate));
}

#[test]
fn missing_fragment_still_reaches_render_loop() {
    let (_dir, config) = shader_dir(Some(VERT), None);

    let logs = LogBuffer::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(logs.clone())
        .with_ansi(false)
        .finish();
    let calls = tracing::subscriber::with_default(subscriber, || run_frames(3, &config));

    let output = logs.contents();
    let missing = config.fragment_path.display().to_string();
    assert!(
        output
            .lines()
            .any(|l| l.contains("File not found.") && l.contains(&missing)),
        "{output}"
    );

    assert_eq!(
        calls[0],
        Call::CreateProgram {
            vert: VERT.into(),
            frag: String::new()
        }
    );
    assert_eq!(calls.iter().filter(|c| **c == Call::Draw).count(), 3);
}

#[test]
fn strict_mode_rejects_broken_program() {
    let (_dir, mut config) = shader_dir(Some(VERT), None);
    config.strict_shaders = true;

    let result = App::new(StubBackend::new(1), FrameClock::start(), &config);

    assert!(matches!(
        result,
        Err(AppError::Shader(ProgramError::Compilation {
            stage: ShaderStage::Fragment,
            ..
        }))
    ));
}

#[test]
fn capture_writes_one_png_per_frame() {
    let (dir, mut config) = shader_dir(Some(VERT), Some(FRAG));
    let frames_dir = dir.path().join("frames");
    config.capture_dir = Some(frames_dir.clone());

    let backend = StubBackend::new(3);
    backend.size.set((4, 2));
    let log = backend.log.clone();

    App::new(backend, FrameClock::start(), &config)
        .unwrap()
        .run()
        .unwrap();

    let calls = log.borrow();
    assert_eq!(
        calls
            .iter()
            .filter(|c| **c == Call::ReadPixels(4, 2))
            .count(),
        3
    );

    let mut pngs: Vec<_> = std::fs::read_dir(&frames_dir)
        .unwrap()
        .map(|e| e.unwrap().path())
        .filter(|p| p.extension().map_or(false, |e| e == "png"))
        .collect();
    pngs.sort();
    assert_eq!(pngs.len(), 3, "{pngs:?}");

    let times = uniform_writes(&calls, "time");
    for (i, path) in pngs.iter().enumerate() {
        let (width, height, pixels) = decode_png(path);
        assert_eq!((width, height), (4, 2));
        assert_eq!(pixels, vec![128; 4 * 2 * 3]);

        // frame_<index>_<seconds>.png, named after the `time` that frame was drawn with
        let stem = path.file_stem().unwrap().to_str().unwrap();
        let mut parts = stem.strip_prefix("frame_").unwrap().splitn(2, '_');
        let index: usize = parts.next().unwrap().parse().unwrap();
        let seconds: f64 = parts.next().unwrap().parse().unwrap();

        assert_eq!(index, i);
        assert!(
            (seconds - times[i] as f64).abs() < 1e-5,
            "{stem} drawn at {}",
            times[i]
        );
    }
}

fn decode_png(path: &Path) -> (u32, u32, Vec<u8>) {
    let mut reader = png::Decoder::new(File::open(path).unwrap())
        .read_info()
        .unwrap();
    let mut pixels = vec![0; reader.output_buffer_size()];
    let info = reader.next_frame(&mut pixels).unwrap();
    assert_eq!(info.color_type, png::ColorType::Rgb);
    pixels.truncate(info.buffer_size());
    (info.width, info.height, pixels)
}

#[derive(Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        io::Write::write(&mut *self.0.lock().unwrap(), buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogBuffer {
    type Writer = LogBuffer;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}
