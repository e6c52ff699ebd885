//! Chat Hand-off
//!
//! A chat bot can hand a file to the app through a start parameter of the
//! form `<file_id>_<chat_id>`. The hand-off service parses the parameter,
//! fetches the payload through the [`RemoteFileSource`] contract, pushes
//! it through the import pipeline, and reports the outcome back to the
//! originating chat. Notification delivery is best-effort: a failed send
//! never changes the import result.

use crate::error::{Result, ServiceError};
use crate::import::{AudioUpload, ImportPipeline};
use collab_traits::{Notifier, RemoteFileSource};
use core_library::models::Song;
use std::sync::Arc;
use tracing::{info, warn};

/// Parsed `<file_id>_<chat_id>` start parameter.
///
/// File ids may themselves contain underscores, so the parameter splits on
/// the last one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartParam {
    pub file_id: String,
    pub chat_id: String,
}

impl StartParam {
    /// # Errors
    ///
    /// [`ServiceError::InvalidStartParam`] when the separator is missing
    /// or either side is empty.
    pub fn parse(raw: &str) -> Result<Self> {
        let (file_id, chat_id) = raw
            .rsplit_once('_')
            .ok_or_else(|| ServiceError::InvalidStartParam(raw.to_string()))?;

        if file_id.is_empty() || chat_id.is_empty() {
            return Err(ServiceError::InvalidStartParam(raw.to_string()));
        }

        Ok(Self {
            file_id: file_id.to_string(),
            chat_id: chat_id.to_string(),
        })
    }
}

/// Orchestrates fetch, import, and outcome notification for one hand-off.
#[derive(Clone)]
pub struct HandoffService {
    pipeline: ImportPipeline,
    remote: Arc<dyn RemoteFileSource>,
    notifier: Arc<dyn Notifier>,
}

impl HandoffService {
    pub fn new(
        pipeline: ImportPipeline,
        remote: Arc<dyn RemoteFileSource>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            pipeline,
            remote,
            notifier,
        }
    }

    /// Handle one start parameter end to end.
    ///
    /// Fetch and import failures are reported to the chat and then
    /// propagated; a parse failure is propagated without a notification
    /// because there is no chat id to reach.
    pub async fn handle(&self, raw_start_param: &str) -> Result<Song> {
        let param = StartParam::parse(raw_start_param)?;
        info!(file_id = %param.file_id, chat_id = %param.chat_id, "Handling chat hand-off");

        match self.fetch_and_import(&param).await {
            Ok(song) => {
                let text = format!(
                    "✅ Song \"{}\" was successfully added to your library!",
                    song.title
                );
                self.notify(&param.chat_id, &text).await;
                Ok(song)
            }
            Err(e) => {
                let text = format!("❌ Failed to add song to your library. Error: {}", e);
                self.notify(&param.chat_id, &text).await;
                Err(e)
            }
        }
    }

    async fn fetch_and_import(&self, param: &StartParam) -> Result<Song> {
        let file = self.remote.fetch(&param.file_id).await?;

        self.pipeline
            .import(AudioUpload {
                bytes: file.content,
                content_type: file.content_type,
                file_name: file.suggested_file_name,
            })
            .await
    }

    /// Best-effort delivery; failures are logged and swallowed.
    async fn notify(&self, chat_id: &str, text: &str) {
        match self.notifier.send_message(chat_id, text).await {
            Ok(receipt) if !receipt.ok => {
                warn!(
                    chat_id,
                    description = receipt.description.as_deref().unwrap_or(""),
                    "Chat rejected the outcome notification"
                );
            }
            Ok(_) => {}
            Err(e) => {
                warn!(chat_id, error = %e, "Failed to deliver outcome notification");
            }
        }
    }
}
