//! Dedicated thread owning every cpal stream.
//!
//! cpal streams are `!Send` on some platforms, so capture and playback live
//! on one OS thread. [`AudioThreadHandle`] is `Send + Sync` and talks to it
//! over a channel; replies come back on oneshot channels the async side can
//! await.

use crate::{
    CoreResult, NotesError,
    audio::{
        AudioCapturer, AudioPlayer,
        capture::{CapturedAudio, input_available},
    },
};

use std::{
    panic::Location,
    sync::mpsc::{self, Receiver, RecvTimeoutError, Sender},
    thread::{self, JoinHandle},
    time::Duration,
};

use error_location::ErrorLocation;
use tokio::sync::oneshot;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// How often the thread wakes to release finished playback streams.
const REAP_INTERVAL: Duration = Duration::from_millis(100);

enum AudioCommand {
    Probe {
        response_tx: oneshot::Sender<bool>,
    },
    Start {
        session_id: Uuid,
        response_tx: oneshot::Sender<CoreResult<()>>,
    },
    Stop {
        session_id: Uuid,
        response_tx: oneshot::Sender<CoreResult<CapturedAudio>>,
    },
    Play {
        samples: Vec<f32>,
        sample_rate: u32,
        response_tx: oneshot::Sender<CoreResult<()>>,
    },
    Shutdown,
}

/// Handle to the audio thread. Dropping it shuts the thread down.
pub(crate) struct AudioThreadHandle {
    sender: Sender<AudioCommand>,
    thread: Option<JoinHandle<()>>,
}

#[track_caller]
fn disconnected() -> NotesError {
    NotesError::CaptureFailed {
        reason: "Audio thread disconnected".to_string(),
        location: ErrorLocation::from(Location::caller()),
    }
}

impl AudioThreadHandle {
    pub(crate) fn spawn() -> Self {
        let (sender, receiver) = mpsc::channel();

        let thread = thread::Builder::new()
            .name("voice-notes-audio".to_string())
            .spawn(move || audio_thread_main(receiver))
            .map_err(|e| error!("Failed to spawn audio thread: {}", e))
            .ok();

        Self { sender, thread }
    }

    /// Whether the default input device is usable. Errors only when the
    /// audio thread is gone.
    pub(crate) async fn probe(&self) -> CoreResult<bool> {
        let (response_tx, response_rx) = oneshot::channel();
        self.send(AudioCommand::Probe { response_tx })?;
        response_rx.await.map_err(|_| disconnected())
    }

    pub(crate) async fn start(&self, session_id: Uuid) -> CoreResult<()> {
        let (response_tx, response_rx) = oneshot::channel();
        self.send(AudioCommand::Start {
            session_id,
            response_tx,
        })?;
        response_rx.await.map_err(|_| disconnected())?
    }

    pub(crate) async fn stop(&self, session_id: Uuid) -> CoreResult<CapturedAudio> {
        let (response_tx, response_rx) = oneshot::channel();
        self.send(AudioCommand::Stop {
            session_id,
            response_tx,
        })?;
        response_rx.await.map_err(|_| disconnected())?
    }

    pub(crate) async fn play(&self, samples: Vec<f32>, sample_rate: u32) -> CoreResult<()> {
        let (response_tx, response_rx) = oneshot::channel();
        self.send(AudioCommand::Play {
            samples,
            sample_rate,
            response_tx,
        })?;
        response_rx.await.map_err(|_| disconnected())?
    }

    #[track_caller]
    fn send(&self, command: AudioCommand) -> CoreResult<()> {
        self.sender.send(command).map_err(|_| disconnected())
    }
}

impl Drop for AudioThreadHandle {
    fn drop(&mut self) {
        let _ = self.sender.send(AudioCommand::Shutdown);

        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                error!("Audio thread panicked");
            }
        }
    }
}

fn audio_thread_main(receiver: Receiver<AudioCommand>) {
    info!("Audio thread started");

    let mut capture: Option<(Uuid, AudioCapturer)> = None;
    let mut player = AudioPlayer::default();

    loop {
        let command = match receiver.recv_timeout(REAP_INTERVAL) {
            Ok(command) => command,
            Err(RecvTimeoutError::Timeout) => {
                player.reap();
                continue;
            }
            Err(RecvTimeoutError::Disconnected) => break,
        };

        match command {
            AudioCommand::Probe { response_tx } => {
                let _ = response_tx.send(input_available());
            }
            AudioCommand::Start {
                session_id,
                response_tx,
            } => {
                let result = if capture.is_some() {
                    Err(NotesError::AlreadyRecording {
                        location: ErrorLocation::from(Location::caller()),
                    })
                } else {
                    AudioCapturer::new().and_then(|mut capturer| {
                        capturer.start()?;
                        capture = Some((session_id, capturer));
                        Ok(())
                    })
                };
                let _ = response_tx.send(result);
            }
            AudioCommand::Stop {
                session_id,
                response_tx,
            } => {
                let result = match capture.take() {
                    Some((active, mut capturer)) => {
                        if active != session_id {
                            warn!(
                                requested = %session_id,
                                active = %active,
                                "Stop requested for a different session, stopping active capture"
                            );
                        }
                        capturer.stop()
                    }
                    None => Err(NotesError::NotRecording {
                        location: ErrorLocation::from(Location::caller()),
                    }),
                };
                let _ = response_tx.send(result);
            }
            AudioCommand::Play {
                samples,
                sample_rate,
                response_tx,
            } => {
                let _ = response_tx.send(player.play(samples, sample_rate));
            }
            AudioCommand::Shutdown => break,
        }
    }

    if let Some((session_id, mut capturer)) = capture.take() {
        warn!(session_id = %session_id, "Discarding unfinished capture on shutdown");
        let _ = capturer.stop();
    }
    player.stop();

    debug!("Audio thread stopped");
}
