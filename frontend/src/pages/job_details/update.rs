//! Message handling for the job details page.
//!
//! Poller messages carry the generation of the poller that sent them; a
//! message from a replaced or cancelled poller is ignored. Running a job
//! (first start or retry after `FAILED`) restarts polling from scratch.

use yew::platform::spawn_local;
use yew::prelude::*;

use common::model::ControlCatalog;
use common::{PollOutcome, PollUpdate};

use crate::app::Page;
use crate::components::helpers::show_toast;

use super::messages::Msg;
use super::state::JobDetails;
use super::{load_gaps, start_polling};

pub fn update(details: &mut JobDetails, ctx: &Context<JobDetails>, msg: Msg) -> bool {
    match msg {
        Msg::Poll(generation, update) => {
            if generation != details.generation {
                return false;
            }
            match update {
                PollUpdate::Status(job) => details.job = Some(job),
                PollUpdate::Evidence(list) => {
                    details.evidence = Some(list);
                    load_gaps(ctx);
                }
                PollUpdate::Error(err) => details.poll_error = Some(err.message()),
            }
            true
        }
        Msg::PollEnded(generation, outcome) => {
            if generation != details.generation {
                return false;
            }
            details.poll_token = None;
            match outcome {
                PollOutcome::Finished(status) => {
                    log::debug!("job {} settled as {}", ctx.props().job_id, status.as_str())
                }
                PollOutcome::Errored => {
                    log::debug!("polling {} stopped on error", ctx.props().job_id)
                }
                PollOutcome::Cancelled => {}
            }
            true
        }
        Msg::CatalogLoaded(result) => {
            match result {
                Ok(list) => details.catalog = Some(ControlCatalog::from(&list)),
                Err(err) => log::warn!("control catalog unavailable: {err}"),
            }
            details.evidence.is_some()
        }
        Msg::GapsLoaded(result) => {
            match result {
                Ok(list) => details.gaps = Some(list.gaps),
                Err(err) => log::warn!("gaps of {} unavailable: {err}", ctx.props().job_id),
            }
            true
        }
        Msg::RetryPoll => {
            start_polling(details, ctx);
            true
        }
        Msg::Run => {
            if details.busy {
                return false;
            }
            details.busy = true;
            details.action_error = None;
            let client = ctx.props().client.clone();
            let link = ctx.link().clone();
            let job_id = ctx.props().job_id.clone();
            spawn_local(async move {
                link.send_message(Msg::RunFinished(client.jobs().run(&job_id).await));
            });
            true
        }
        Msg::RunFinished(result) => {
            details.busy = false;
            match result {
                Ok(job) => {
                    details.job = Some(job);
                    details.evidence = None;
                    details.gaps = None;
                    start_polling(details, ctx);
                }
                Err(err) => {
                    show_toast("Could not start the analysis");
                    details.action_error = Some(err.message());
                }
            }
            true
        }
        Msg::Delete => {
            let confirmed = web_sys::window()
                .and_then(|w| w.confirm_with_message("Delete this analysis and its results?").ok())
                .unwrap_or(false);
            if !confirmed || details.busy {
                return false;
            }
            details.busy = true;
            details.stop_polling();
            let client = ctx.props().client.clone();
            let link = ctx.link().clone();
            let job_id = ctx.props().job_id.clone();
            spawn_local(async move {
                link.send_message(Msg::DeleteFinished(client.jobs().delete(&job_id).await));
            });
            true
        }
        Msg::DeleteFinished(result) => {
            details.busy = false;
            match result {
                Ok(()) => {
                    show_toast("Analysis deleted");
                    ctx.props().on_navigate.emit(Page::Dashboard);
                }
                Err(err) => {
                    details.action_error = Some(err.message());
                    if details.job.as_ref().is_some_and(|job| !job.status.is_terminal()) {
                        start_polling(details, ctx);
                    }
                }
            }
            true
        }
        Msg::Back => {
            ctx.props().on_navigate.emit(Page::Dashboard);
            false
        }
    }
}

/// Whether the page should offer to (re)start the job.
pub fn can_run(details: &JobDetails) -> bool {
    !details.busy && details.job.as_ref().is_some_and(|job| job.status.can_run())
}
