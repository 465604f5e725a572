//! In-process backends standing in for the native library.
#![allow(dead_code)]

use std::{
    cell::{Cell, RefCell},
    collections::HashMap,
    sync::{
        Arc, Mutex, MutexGuard,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    },
    thread,
    time::Duration,
};

use cv_videoio::{
    CaptureApi, CaptureBackend, CaptureProperty, FourCc, Result, VideoIoError, WriterBackend,
    WriterTarget,
};

pub type Frame = Vec<u8>;

#[derive(Clone, Debug, PartialEq)]
pub enum OpenCall {
    File(String, CaptureApi),
    Device(i32, CaptureApi),
}

#[derive(Debug, Default)]
pub struct CaptureState {
    pub open_calls: Vec<OpenCall>,
    pub opened: bool,
    pub position: usize,
    pub properties: HashMap<CaptureProperty, f64>,
    pub releases: usize,
}

/// Source producing `frame_count` frames whose bytes are the frame index.
#[derive(Clone)]
pub struct FakeCapture {
    state: Arc<Mutex<CaptureState>>,
    frame_count: usize,
    refuse_open: bool,
    raise_on_get: bool,
}

impl FakeCapture {
    pub fn with_frames(frame_count: usize) -> Self {
        let mut state = CaptureState::default();
        state.properties.insert(CaptureProperty::FRAME_WIDTH, 560.0);
        state.properties.insert(CaptureProperty::FRAME_HEIGHT, 320.0);
        state.properties.insert(CaptureProperty::FPS, 25.0);
        state
            .properties
            .insert(CaptureProperty::FRAME_COUNT, frame_count as f64);
        Self {
            state: Arc::new(Mutex::new(state)),
            frame_count,
            refuse_open: false,
            raise_on_get: false,
        }
    }

    /// Every open reports failure, like a missing file.
    pub fn refusing() -> Self {
        Self {
            refuse_open: true,
            ..Self::with_frames(0)
        }
    }

    /// Property reads raise native errors.
    pub fn raising_on_get(mut self) -> Self {
        self.raise_on_get = true;
        self
    }

    pub fn state(&self) -> MutexGuard<'_, CaptureState> {
        self.state.lock().expect("capture state")
    }

    fn record_open(&mut self, call: OpenCall) -> bool {
        let mut state = self.state();
        state.open_calls.push(call);
        state.opened = !self.refuse_open;
        state.position = 0;
        state.opened
    }
}

impl CaptureBackend for FakeCapture {
    type Frame = Frame;

    fn create() -> Result<Self> {
        Ok(Self::with_frames(30))
    }

    fn open_file(&mut self, uri: &str, api: CaptureApi) -> Result<bool> {
        Ok(self.record_open(OpenCall::File(uri.to_string(), api)))
    }

    fn open_device(&mut self, index: i32, api: CaptureApi) -> Result<bool> {
        Ok(self.record_open(OpenCall::Device(index, api)))
    }

    fn is_opened(&self) -> Result<bool> {
        Ok(self.state().opened)
    }

    fn read(&mut self, frame: &mut Frame) -> Result<bool> {
        let mut state = self.state();
        if !state.opened || state.position >= self.frame_count {
            return Ok(false);
        }
        frame.clear();
        frame.resize(8, state.position as u8);
        state.position += 1;
        Ok(true)
    }

    fn grab(&mut self) -> Result<bool> {
        let mut state = self.state();
        if !state.opened || state.position >= self.frame_count {
            return Ok(false);
        }
        state.position += 1;
        Ok(true)
    }

    fn get(&self, property: CaptureProperty) -> Result<f64> {
        if self.raise_on_get {
            return Err(VideoIoError::Backend(format!("get({property}) raised")));
        }
        Ok(self.state().properties.get(&property).copied().unwrap_or(0.0))
    }

    fn set(&mut self, property: CaptureProperty, value: f64) -> Result<bool> {
        self.state().properties.insert(property, value);
        Ok(true)
    }

    fn release(&mut self) -> Result<()> {
        let mut state = self.state();
        state.opened = false;
        state.releases += 1;
        Ok(())
    }
}

thread_local! {
    static WRITERS_CREATED: Cell<usize> = const { Cell::new(0) };
    static LAST_WRITER: RefCell<Option<Arc<Mutex<WriterState>>>> = const { RefCell::new(None) };
}

/// Writers allocated through `WriterBackend::create` on this thread.
pub fn writers_created() -> usize {
    WRITERS_CREATED.with(Cell::get)
}

/// State of the writer most recently allocated on this thread.
pub fn last_writer_state() -> Arc<Mutex<WriterState>> {
    LAST_WRITER.with(|last| last.borrow().clone().expect("a writer was created"))
}

#[derive(Debug, Default)]
pub struct WriterState {
    pub target: Option<WriterTarget>,
    pub fourcc: Option<FourCc>,
    pub fps: f64,
    pub frame_size: (i32, i32),
    pub is_color: bool,
    pub opened: bool,
    pub frames: Vec<Frame>,
    pub releases: usize,
}

/// Sink that records frames and counts overlapping writes.
#[derive(Clone, Default)]
pub struct FakeWriter {
    state: Arc<Mutex<WriterState>>,
    in_flight: Arc<AtomicBool>,
    overlaps: Arc<AtomicUsize>,
    refuse_open: bool,
    write_delay: Duration,
}

impl FakeWriter {
    pub fn refusing() -> Self {
        Self {
            refuse_open: true,
            ..Self::default()
        }
    }

    /// Hold each write for `delay` so concurrent callers would overlap
    /// without the adapter's lock.
    pub fn slow(delay: Duration) -> Self {
        Self {
            write_delay: delay,
            ..Self::default()
        }
    }

    pub fn state(&self) -> MutexGuard<'_, WriterState> {
        self.state.lock().expect("writer state")
    }

    pub fn overlaps(&self) -> usize {
        self.overlaps.load(Ordering::SeqCst)
    }
}

impl WriterBackend for FakeWriter {
    type Frame = Frame;

    fn create() -> Result<Self> {
        WRITERS_CREATED.with(|count| count.set(count.get() + 1));
        let writer = Self::default();
        LAST_WRITER.with(|last| *last.borrow_mut() = Some(writer.state.clone()));
        Ok(writer)
    }

    fn open(
        &mut self,
        target: &WriterTarget,
        fourcc: FourCc,
        fps: f64,
        frame_size: (i32, i32),
        is_color: bool,
    ) -> Result<bool> {
        let mut state = self.state();
        state.target = Some(target.clone());
        state.fourcc = Some(fourcc);
        state.fps = fps;
        state.frame_size = frame_size;
        state.is_color = is_color;
        state.opened = !self.refuse_open;
        Ok(state.opened)
    }

    fn is_opened(&self) -> Result<bool> {
        Ok(self.state().opened)
    }

    fn write(&mut self, frame: &Frame) -> Result<()> {
        if self.in_flight.swap(true, Ordering::SeqCst) {
            self.overlaps.fetch_add(1, Ordering::SeqCst);
        }
        if !self.write_delay.is_zero() {
            thread::sleep(self.write_delay);
        }
        self.state().frames.push(frame.clone());
        self.in_flight.store(false, Ordering::SeqCst);
        Ok(())
    }

    fn release(&mut self) -> Result<()> {
        let mut state = self.state();
        state.opened = false;
        state.releases += 1;
        Ok(())
    }
}
