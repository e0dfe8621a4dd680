//! In-memory `FaceGateway` used by the session tests.
//!
//! Responses are scripted per operation and consumed in call order. A
//! scripted response can be held back behind a gate so tests can
//! interleave user actions with an in-flight request.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use facewatch_core::validation::NonBlank;
use facewatch_core::video::{AnalysisResponse, AnalysisStatus, FaceDetection, VideoRecord};
use facewatch_gateway::{FaceGateway, GatewayError};
use tokio::sync::oneshot;

pub type Outcome<T> = Result<T, GatewayError>;

struct Scripted<T> {
    gate: Option<oneshot::Receiver<()>>,
    outcome: Outcome<T>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    ListActive,
    ListArchived,
    StartAnalysis(String),
    Tag {
        video_id: String,
        old_name: String,
        new_name: String,
    },
    Train {
        person_name: String,
        image_url: String,
    },
    ListSubjects,
}

#[derive(Default)]
struct Scripts {
    active: VecDeque<Scripted<Vec<VideoRecord>>>,
    archived: VecDeque<Scripted<Vec<VideoRecord>>>,
    analysis: VecDeque<Scripted<AnalysisResponse>>,
    tag: VecDeque<Scripted<()>>,
    train: VecDeque<Scripted<()>>,
    subjects: VecDeque<Scripted<Vec<String>>>,
}

#[derive(Default)]
pub struct FakeGateway {
    scripts: Mutex<Scripts>,
    calls: Mutex<Vec<Call>>,
}

/// Release handle for a gated response.
pub struct Gate(oneshot::Sender<()>);

impl Gate {
    pub fn open(self) {
        let _ = self.0.send(());
    }
}

fn scripted<T>(outcome: Outcome<T>) -> Scripted<T> {
    Scripted {
        gate: None,
        outcome,
    }
}

fn gated<T>(outcome: Outcome<T>) -> (Scripted<T>, Gate) {
    let (tx, rx) = oneshot::channel();
    (
        Scripted {
            gate: Some(rx),
            outcome,
        },
        Gate(tx),
    )
}

async fn play<T>(next: Option<Scripted<T>>, what: &str) -> Outcome<T> {
    let Some(script) = next else {
        panic!("unexpected {what} call: nothing scripted");
    };
    if let Some(gate) = script.gate {
        let _ = gate.await;
    }
    script.outcome
}

impl FakeGateway {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| pred(c)).count()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    pub fn push_active(&self, outcome: Outcome<Vec<VideoRecord>>) {
        self.scripts.lock().unwrap().active.push_back(scripted(outcome));
    }

    pub fn push_archived(&self, outcome: Outcome<Vec<VideoRecord>>) {
        self.scripts.lock().unwrap().archived.push_back(scripted(outcome));
    }

    pub fn push_analysis(&self, outcome: Outcome<AnalysisResponse>) {
        self.scripts.lock().unwrap().analysis.push_back(scripted(outcome));
    }

    pub fn push_tag(&self, outcome: Outcome<()>) {
        self.scripts.lock().unwrap().tag.push_back(scripted(outcome));
    }

    pub fn push_tag_gated(&self, outcome: Outcome<()>) -> Gate {
        let (script, gate) = gated(outcome);
        self.scripts.lock().unwrap().tag.push_back(script);
        gate
    }

    pub fn push_train(&self, outcome: Outcome<()>) {
        self.scripts.lock().unwrap().train.push_back(scripted(outcome));
    }

    pub fn push_subjects(&self, outcome: Outcome<Vec<String>>) {
        self.scripts.lock().unwrap().subjects.push_back(scripted(outcome));
    }

    pub fn push_subjects_gated(&self, outcome: Outcome<Vec<String>>) -> Gate {
        let (script, gate) = gated(outcome);
        self.scripts.lock().unwrap().subjects.push_back(script);
        gate
    }
}

#[async_trait]
impl FaceGateway for FakeGateway {
    async fn list_active_videos(&self) -> Outcome<Vec<VideoRecord>> {
        self.record(Call::ListActive);
        let next = self.scripts.lock().unwrap().active.pop_front();
        play(next, "list_active_videos").await
    }

    async fn list_archived_videos(&self) -> Outcome<Vec<VideoRecord>> {
        self.record(Call::ListArchived);
        let next = self.scripts.lock().unwrap().archived.pop_front();
        play(next, "list_archived_videos").await
    }

    async fn start_analysis(&self, video_url: &NonBlank) -> Outcome<AnalysisResponse> {
        self.record(Call::StartAnalysis(video_url.to_string()));
        let next = self.scripts.lock().unwrap().analysis.pop_front();
        play(next, "start_analysis").await
    }

    async fn tag_person(&self, video_id: &str, old_name: &str, new_name: &NonBlank) -> Outcome<()> {
        self.record(Call::Tag {
            video_id: video_id.to_string(),
            old_name: old_name.to_string(),
            new_name: new_name.to_string(),
        });
        let next = self.scripts.lock().unwrap().tag.pop_front();
        play(next, "tag_person").await
    }

    async fn train_subject(&self, person_name: &NonBlank, image_url: &NonBlank) -> Outcome<()> {
        self.record(Call::Train {
            person_name: person_name.to_string(),
            image_url: image_url.to_string(),
        });
        let next = self.scripts.lock().unwrap().train.pop_front();
        play(next, "train_subject").await
    }

    async fn list_subjects(&self) -> Outcome<Vec<String>> {
        self.record(Call::ListSubjects);
        let next = self.scripts.lock().unwrap().subjects.pop_front();
        play(next, "list_subjects").await
    }
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub fn remote(message: &str) -> GatewayError {
    GatewayError::Remote {
        status: 400,
        message: message.to_string(),
    }
}

pub fn network(operation: &'static str) -> GatewayError {
    GatewayError::Network {
        operation,
        status: 502,
        reason: "Bad Gateway".to_string(),
    }
}

pub fn face(name: &str, first: &str, last: &str) -> FaceDetection {
    FaceDetection {
        name: name.to_string(),
        first_timecode: first.to_string(),
        last_timecode: last.to_string(),
        appearances: 1,
        thumbnail_url: None,
    }
}

pub fn video(id: &str, status: AnalysisStatus, faces: Option<Vec<FaceDetection>>) -> VideoRecord {
    VideoRecord {
        video_id: id.to_string(),
        video_name: format!("{id}.mp4"),
        duration_seconds: Some(42.0),
        analysis_status: status,
        faces,
    }
}

pub fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}
