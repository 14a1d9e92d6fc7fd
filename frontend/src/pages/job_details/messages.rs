use common::model::{ControlList, GapList, Job};
use common::{ApiError, PollOutcome, PollUpdate};

pub enum Msg {
    /// Update from the poller tagged with the generation that produced it.
    Poll(u32, PollUpdate),
    PollEnded(u32, PollOutcome),
    CatalogLoaded(Result<ControlList, ApiError>),
    GapsLoaded(Result<GapList, ApiError>),
    RetryPoll,
    Run,
    RunFinished(Result<Job, ApiError>),
    Delete,
    DeleteFinished(Result<(), ApiError>),
    Back,
}
