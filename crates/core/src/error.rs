use parley_storage::{ChatId, MessageId, StorageError};
use snafu::Snafu;

use crate::delivery::TransitionRejection;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum CoreError {
    #[snafu(display("message '{message_id}' in chat '{chat_id}' was not found"))]
    MessageNotFound {
        stage: &'static str,
        chat_id: ChatId,
        message_id: MessageId,
    },
    #[snafu(display(
        "status change for message '{message_id}' in chat '{chat_id}' was rejected: {rejection:?}"
    ))]
    TransitionRejected {
        stage: &'static str,
        chat_id: ChatId,
        message_id: MessageId,
        rejection: TransitionRejection,
    },
    #[snafu(display("message source failed on `{stage}`: {source}"))]
    Source {
        stage: &'static str,
        source: StorageError,
    },
}

pub type CoreResult<T> = Result<T, CoreError>;
