//! Single-writer project state owner
//!
//! A [`ProjectSession`] task owns one [`VideoProject`] and applies
//! [`ProjectCommand`]s one at a time, so concurrent edits (a manual clip
//! edit racing a re-arrangement) are serialized. [`ProjectHandle`] is the
//! only access path; other components work on snapshots.

use crate::error::ProjectError;
use crate::models::{
    AudioAnalysis, ColorGrading, LyricsData, VideoClip, VideoProject, VideoTransition,
};
use crate::services::clip_arranger::arrange;
use std::path::PathBuf;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info};
use uuid::Uuid;

/// Command queue depth per session
const COMMAND_BUFFER: usize = 32;

/// Commands accepted by a project session
#[derive(Debug)]
pub enum ProjectCommand {
    Snapshot {
        reply: oneshot::Sender<VideoProject>,
    },
    /// Attach analysis and the decoded track length
    SetAnalysis {
        analysis: AudioAnalysis,
        duration_seconds: f64,
        reply: oneshot::Sender<()>,
    },
    SetLyrics {
        lyrics: LyricsData,
        reply: oneshot::Sender<Result<(), ProjectError>>,
    },
    /// Replace the clip list; the new list is arranged immediately
    ReplaceClips {
        clips: Vec<VideoClip>,
        reply: oneshot::Sender<Vec<VideoClip>>,
    },
    /// Replace one clip in place (matched by id)
    UpdateClip {
        clip: VideoClip,
        reply: oneshot::Sender<Result<(), ProjectError>>,
    },
    /// Remove one clip and re-arrange the rest
    RemoveClip {
        id: Uuid,
        reply: oneshot::Sender<Result<Vec<VideoClip>, ProjectError>>,
    },
    SetColorGrading {
        grading: ColorGrading,
        reply: oneshot::Sender<()>,
    },
    AddTransition {
        transition: VideoTransition,
        reply: oneshot::Sender<()>,
    },
    SetExportLocation {
        path: PathBuf,
        reply: oneshot::Sender<()>,
    },
}

/// Task owning one project
pub struct ProjectSession {
    project: VideoProject,
    rx: mpsc::Receiver<ProjectCommand>,
}

impl ProjectSession {
    /// Spawn a session task for `project`
    ///
    /// The task ends, returning the final project, once every handle is
    /// dropped.
    pub fn spawn(project: VideoProject) -> (ProjectHandle, JoinHandle<VideoProject>) {
        let (tx, rx) = mpsc::channel(COMMAND_BUFFER);
        let project_id = project.id;
        let session = Self { project, rx };
        let task = tokio::spawn(session.run());
        (ProjectHandle { tx, project_id }, task)
    }

    async fn run(mut self) -> VideoProject {
        debug!(project_id = %self.project.id, "Project session started");

        while let Some(command) = self.rx.recv().await {
            self.apply(command);
        }

        debug!(project_id = %self.project.id, "Project session closed");
        self.project
    }

    fn apply(&mut self, command: ProjectCommand) {
        // A dropped reply receiver only means the caller stopped waiting
        match command {
            ProjectCommand::Snapshot { reply } => {
                let _ = reply.send(self.project.clone());
            }
            ProjectCommand::SetAnalysis {
                analysis,
                duration_seconds,
                reply,
            } => {
                let song = &mut self.project.song;
                song.duration = duration_seconds;
                *song = song.clone().with_analysis(analysis);
                self.project.touch();
                let _ = reply.send(());
            }
            ProjectCommand::SetLyrics { lyrics, reply } => {
                let result = self
                    .project
                    .song
                    .clone()
                    .with_lyrics(lyrics)
                    .map(|song| {
                        self.project.song = song;
                        self.project.touch();
                    });
                let _ = reply.send(result);
            }
            ProjectCommand::ReplaceClips { clips, reply } => {
                self.project.clips = arrange(clips, self.project.song.duration);
                self.project.touch();
                info!(
                    project_id = %self.project.id,
                    clip_count = self.project.clips.len(),
                    "Clips replaced"
                );
                let _ = reply.send(self.project.clips.clone());
            }
            ProjectCommand::UpdateClip { clip, reply } => {
                let result = match self.project.clips.iter_mut().find(|c| c.id == clip.id) {
                    Some(slot) => {
                        *slot = clip;
                        self.project.touch();
                        Ok(())
                    }
                    None => Err(ProjectError::ClipNotFound(clip.id)),
                };
                let _ = reply.send(result);
            }
            ProjectCommand::RemoveClip { id, reply } => {
                let before = self.project.clips.len();
                let remaining: Vec<VideoClip> = std::mem::take(&mut self.project.clips)
                    .into_iter()
                    .filter(|c| c.id != id)
                    .collect();

                let result = if remaining.len() == before {
                    self.project.clips = remaining;
                    Err(ProjectError::ClipNotFound(id))
                } else {
                    self.project.clips = arrange(remaining, self.project.song.duration);
                    self.project.touch();
                    Ok(self.project.clips.clone())
                };
                let _ = reply.send(result);
            }
            ProjectCommand::SetColorGrading { grading, reply } => {
                self.project.color_grading = grading.clamped();
                self.project.touch();
                let _ = reply.send(());
            }
            ProjectCommand::AddTransition { transition, reply } => {
                self.project.transitions.push(transition);
                self.project.touch();
                let _ = reply.send(());
            }
            ProjectCommand::SetExportLocation { path, reply } => {
                self.project.export_location = Some(path);
                self.project.touch();
                let _ = reply.send(());
            }
        }
    }
}

/// Cloneable handle to a project session
#[derive(Debug, Clone)]
pub struct ProjectHandle {
    tx: mpsc::Sender<ProjectCommand>,
    project_id: Uuid,
}

impl ProjectHandle {
    pub fn project_id(&self) -> Uuid {
        self.project_id
    }

    async fn request<T>(
        &self,
        make: impl FnOnce(oneshot::Sender<T>) -> ProjectCommand,
    ) -> Result<T, ProjectError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(make(reply))
            .await
            .map_err(|_| ProjectError::SessionClosed)?;
        rx.await.map_err(|_| ProjectError::SessionClosed)
    }

    pub async fn snapshot(&self) -> Result<VideoProject, ProjectError> {
        self.request(|reply| ProjectCommand::Snapshot { reply }).await
    }

    pub async fn set_analysis(
        &self,
        analysis: AudioAnalysis,
        duration_seconds: f64,
    ) -> Result<(), ProjectError> {
        self.request(|reply| ProjectCommand::SetAnalysis {
            analysis,
            duration_seconds,
            reply,
        })
        .await
    }

    /// Fails with `NotAnalyzed` if the song has no analysis yet
    pub async fn set_lyrics(&self, lyrics: LyricsData) -> Result<(), ProjectError> {
        self.request(|reply| ProjectCommand::SetLyrics { lyrics, reply })
            .await?
    }

    /// Replace and arrange the clip list, returning the arranged clips
    pub async fn replace_clips(&self, clips: Vec<VideoClip>) -> Result<Vec<VideoClip>, ProjectError> {
        self.request(|reply| ProjectCommand::ReplaceClips { clips, reply })
            .await
    }

    pub async fn update_clip(&self, clip: VideoClip) -> Result<(), ProjectError> {
        self.request(|reply| ProjectCommand::UpdateClip { clip, reply })
            .await?
    }

    /// Remove a clip and return the re-arranged list
    pub async fn remove_clip(&self, id: Uuid) -> Result<Vec<VideoClip>, ProjectError> {
        self.request(|reply| ProjectCommand::RemoveClip { id, reply })
            .await?
    }

    pub async fn set_color_grading(&self, grading: ColorGrading) -> Result<(), ProjectError> {
        self.request(|reply| ProjectCommand::SetColorGrading { grading, reply })
            .await
    }

    pub async fn add_transition(&self, transition: VideoTransition) -> Result<(), ProjectError> {
        self.request(|reply| ProjectCommand::AddTransition { transition, reply })
            .await
    }

    pub async fn set_export_location(&self, path: PathBuf) -> Result<(), ProjectError> {
        self.request(|reply| ProjectCommand::SetExportLocation { path, reply })
            .await
    }
}
