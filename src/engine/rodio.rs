//! `rodio`-backed implementation of [`MediaEngine`] for `file://` locators.

use std::fs::File;
use std::io::BufReader;
use std::time::Duration;

use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink, Source};
use tracing::warn;
use url::Url;

use super::{EngineError, MediaEngine};

pub struct RodioEngine {
    stream: OutputStream,
    sink: Option<Sink>,
    duration: f64,
}

impl RodioEngine {
    pub fn new() -> Result<Self, EngineError> {
        let mut stream = OutputStreamBuilder::open_default_stream()
            .map_err(|e| EngineError::Device(e.to_string()))?;
        // rodio logs to stderr when OutputStream is dropped. Useful in
        // debugging, noisy otherwise.
        stream.log_on_drop(false);

        Ok(Self {
            stream,
            sink: None,
            duration: 0.0,
        })
    }
}

impl MediaEngine for RodioEngine {
    fn load(&mut self, url: &Url) -> Result<(), EngineError> {
        if url.scheme() != "file" {
            return Err(EngineError::UnsupportedScheme(url.scheme().to_string()));
        }
        let path = url
            .to_file_path()
            .map_err(|()| EngineError::UnsupportedScheme(url.scheme().to_string()))?;

        let file = File::open(&path)?;
        let source =
            Decoder::new(BufReader::new(file)).map_err(|e| EngineError::Decode(e.to_string()))?;
        let duration = source
            .total_duration()
            .map(|d| d.as_secs_f64())
            .unwrap_or(0.0);

        if let Some(old) = self.sink.take() {
            old.stop();
        }

        // The new sink starts paused; the session decides when to play.
        let sink = Sink::connect_new(self.stream.mixer());
        sink.append(source);
        sink.pause();

        self.sink = Some(sink);
        self.duration = duration;
        Ok(())
    }

    fn unload(&mut self) {
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }
        self.duration = 0.0;
    }

    fn play(&mut self) {
        if let Some(sink) = &self.sink {
            sink.play();
        }
    }

    fn pause(&mut self) {
        if let Some(sink) = &self.sink {
            sink.pause();
        }
    }

    fn seek(&mut self, position: f64) {
        let Some(sink) = &self.sink else { return };
        let target = Duration::from_secs_f64(position.max(0.0));
        if let Err(e) = sink.try_seek(target) {
            warn!(position, "seek failed: {e}");
        }
    }

    fn position(&self) -> f64 {
        self.sink
            .as_ref()
            .map(|s| s.get_pos().as_secs_f64())
            .unwrap_or(0.0)
    }

    fn duration(&self) -> f64 {
        if self.sink.is_some() { self.duration } else { 0.0 }
    }
}
