//! Job details page: follows one analysis job with a `JobPoller` and, once it
//! succeeds, renders the analysis dashboard and the gaps report.
//!
//! The poller runs in a `spawn_local` task and reports back through the
//! component's scope. It is cancelled when the page is destroyed and when the
//! `job_id` prop changes.

use yew::platform::spawn_local;
use yew::prelude::*;

use common::{CancelToken, JobPoller};

mod messages;
mod props;
mod state;
mod update;
mod view;

pub use messages::Msg;
pub use props::JobDetailsProps;
pub use state::JobDetails;

impl Component for JobDetails {
    type Message = Msg;
    type Properties = JobDetailsProps;

    fn create(ctx: &Context<Self>) -> Self {
        let mut details = JobDetails::new();
        load_catalog(ctx);
        start_polling(&mut details, ctx);
        details
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        update::update(self, ctx, msg)
    }

    fn changed(&mut self, ctx: &Context<Self>, old_props: &Self::Properties) -> bool {
        if ctx.props().job_id != old_props.job_id {
            log::debug!("job details switched {} -> {}", old_props.job_id, ctx.props().job_id);
            self.reset();
            start_polling(self, ctx);
        }
        true
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        view::view(self, ctx)
    }

    fn destroy(&mut self, _ctx: &Context<Self>) {
        self.stop_polling();
    }
}

/// Starts a fresh poller for the current job, replacing any running one.
pub(crate) fn start_polling(details: &mut JobDetails, ctx: &Context<JobDetails>) {
    details.stop_polling();
    details.generation = details.generation.wrapping_add(1);
    details.poll_error = None;

    let generation = details.generation;
    let client = ctx.props().client.clone();
    let job_id = ctx.props().job_id.clone();
    let link = ctx.link().clone();

    let token = CancelToken::new();
    details.poll_token = Some(token.clone());

    spawn_local(async move {
        let poller = JobPoller::new(&*client, job_id).with_cancel_token(token);
        let updates = link.clone();
        let outcome = poller
            .run(move |update| updates.send_message(Msg::Poll(generation, update)))
            .await;
        link.send_message(Msg::PollEnded(generation, outcome));
    });
}

fn load_catalog(ctx: &Context<JobDetails>) {
    let client = ctx.props().client.clone();
    let link = ctx.link().clone();
    spawn_local(async move {
        link.send_message(Msg::CatalogLoaded(client.controls().catalog().await));
    });
}

pub(crate) fn load_gaps(ctx: &Context<JobDetails>) {
    let client = ctx.props().client.clone();
    let link = ctx.link().clone();
    let job_id = ctx.props().job_id.clone();
    spawn_local(async move {
        link.send_message(Msg::GapsLoaded(client.jobs().gaps(&job_id).await));
    });
}
