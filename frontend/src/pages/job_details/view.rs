//! Rendering for the job details page: header with status and actions, a
//! progress card while the job is in flight, the failure reason for `FAILED`
//! jobs, and the analysis dashboard plus gaps once results are in.

use yew::prelude::*;

use common::format::format_optional_date;
use common::model::Job;
use common::JobStatus;

use crate::components::analysis_dashboard::AnalysisDashboard;
use crate::components::gaps_report::GapsReport;
use crate::components::helpers::{status_class, status_icon};

use super::messages::Msg;
use super::state::JobDetails;
use super::update::can_run;

pub fn view(details: &JobDetails, ctx: &Context<JobDetails>) -> Html {
    let link = ctx.link();

    html! {
        <div class="page job-details">
            <button class="link-btn back" onclick={link.callback(|_| Msg::Back)}>
                <i class="material-icons">{"arrow_back"}</i>
                {"Back to Dashboard"}
            </button>

            { build_alerts(details, ctx) }

            {
                match &details.job {
                    None => html! { <div class="spinner">{"Loading analysis..."}</div> },
                    Some(job) => html! {
                        <>
                            { build_header(details, ctx, job) }
                            { build_body(details, job) }
                        </>
                    },
                }
            }
        </div>
    }
}

fn build_alerts(details: &JobDetails, ctx: &Context<JobDetails>) -> Html {
    let link = ctx.link();
    html! {
        <>
            {
                if let Some(error) = &details.poll_error {
                    html! {
                        <div class="alert alert-error">
                            <span>{ format!("Lost track of this analysis: {error}") }</span>
                            <button class="link-btn" onclick={link.callback(|_| Msg::RetryPoll)}>{"Retry"}</button>
                        </div>
                    }
                } else {
                    html! {}
                }
            }
            {
                if let Some(error) = &details.action_error {
                    html! { <div class="alert alert-error"><span>{ error }</span></div> }
                } else {
                    html! {}
                }
            }
        </>
    }
}

fn build_header(details: &JobDetails, ctx: &Context<JobDetails>, job: &Job) -> Html {
    let link = ctx.link();
    let run_label = if job.status == JobStatus::Failed { "Retry Analysis" } else { "Start Analysis" };

    html! {
        <div class="page-header">
            <div>
                <h1>{ job.display_name() }</h1>
                <p class="muted">
                    { format!("{} · created {}", job.scan_type_or_default().label(), format_optional_date(job.created_at.as_deref())) }
                </p>
            </div>
            <div class="header-actions">
                <span class={status_class(job.status)}>
                    <i class="material-icons">{ status_icon(job.status) }</i>
                    { job.status.as_str() }
                </span>
                {
                    if can_run(details) {
                        html! {
                            <button class="btn primary" onclick={link.callback(|_| Msg::Run)}>
                                <i class="material-icons">{"play_arrow"}</i>
                                { run_label }
                            </button>
                        }
                    } else {
                        html! {}
                    }
                }
                <button class="btn danger" disabled={details.busy} onclick={link.callback(|_| Msg::Delete)}>
                    <i class="material-icons">{"delete"}</i>
                    {"Delete"}
                </button>
            </div>
        </div>
    }
}

fn build_body(details: &JobDetails, job: &Job) -> Html {
    match job.status {
        JobStatus::Pending | JobStatus::Running => build_progress(job),
        JobStatus::Failed => html! {
            <div class="card status-card failed">
                <i class="material-icons">{"cancel"}</i>
                <h3>{ job.status.headline() }</h3>
                <p class="muted">
                    { job.error_message.clone().unwrap_or_else(|| "The analysis did not complete.".to_string()) }
                </p>
            </div>
        },
        JobStatus::Cancelled => html! {
            <div class="card status-card">
                <i class="material-icons">{"block"}</i>
                <h3>{ job.status.headline() }</h3>
            </div>
        },
        JobStatus::Succeeded => match details.results() {
            None => html! { <div class="spinner">{"Loading results..."}</div> },
            Some(results) => html! {
                <>
                    <AnalysisDashboard {results} />
                    {
                        match &details.gaps {
                            Some(gaps) => html! { <GapsReport gaps={gaps.clone()} /> },
                            None => html! {},
                        }
                    }
                    <p class="muted">{ format!("Completed {}", format_optional_date(job.completed_at.as_deref())) }</p>
                </>
            },
        },
    }
}

fn build_progress(job: &Job) -> Html {
    let percent = job.progress_percent();
    html! {
        <div class="card status-card">
            <i class="material-icons spin">{ status_icon(job.status) }</i>
            <h3>{ job.status.headline() }</h3>
            {
                if job.status == JobStatus::Running {
                    html! {
                        <>
                            <div class="progress">
                                <div class="progress-bar" style={format!("width: {percent}%")}></div>
                            </div>
                            <p class="muted">
                                { format!("{} of {} controls evaluated ({percent}%)", job.progress, job.total_controls) }
                            </p>
                        </>
                    }
                } else {
                    html! { <p class="muted">{"The analysis is queued and will start shortly."}</p> }
                }
            }
        </div>
    }
}
