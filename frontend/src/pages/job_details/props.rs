use yew::prelude::*;

use crate::app::Page;
use crate::platform::ClientHandle;

#[derive(Properties, PartialEq, Clone)]
pub struct JobDetailsProps {
    pub client: ClientHandle,
    /// Job to follow. A new id tears down the running poller and starts over.
    pub job_id: String,
    pub on_navigate: Callback<Page>,
}
