use yew::{html, Callback, Component, Context, Html, Properties};

use common::format::format_optional_date;
use common::jobs::JobStatus;
use common::model::Job;
use common::transform::recent_jobs;

use super::helpers::{status_class, status_icon};

const SHOWN: usize = 5;

#[derive(Properties, PartialEq, Clone)]
pub struct RecentJobsProps {
    pub jobs: Vec<Job>,
    pub on_select: Callback<String>,
}

pub struct RecentJobs;

impl Component for RecentJobs {
    type Message = ();
    type Properties = RecentJobsProps;

    fn create(_ctx: &Context<Self>) -> Self {
        RecentJobs
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let props = ctx.props();
        if props.jobs.is_empty() {
            return html! {
                <div class="card">
                    <h3>{"Recent Jobs"}</h3>
                    <div class="empty-state">
                        <i class="material-icons muted">{"schedule"}</i>
                        <p>{"No jobs yet"}</p>
                        <p class="muted">{"Upload documents and run your first compliance check"}</p>
                    </div>
                </div>
            };
        }

        html! {
            <div class="card">
                <h3>{"Recent Jobs"}</h3>
                <ul class="divided">
                    { for recent_jobs(&props.jobs, SHOWN).iter().map(|job| job_row(job, &props.on_select)) }
                </ul>
            </div>
        }
    }
}

fn job_row(job: &Job, on_select: &Callback<String>) -> Html {
    let onclick = {
        let id = job.id.clone();
        on_select.reform(move |_| id.clone())
    };
    html! {
        <li class="job-row clickable" key={job.id.clone()} {onclick}>
            <i class="material-icons">{ status_icon(job.status) }</i>
            <div>
                <span class="job-name">{ job.display_name() }</span>
                <span class={status_class(job.status)}>{ job.status.as_str() }</span>
                <p class="muted">{ format_optional_date(job.created_at.as_deref()) }</p>
            </div>
            {
                if job.status == JobStatus::Running {
                    html! {
                        <progress max="100" value={job.progress_percent().to_string()} />
                    }
                } else {
                    html! {}
                }
            }
            <i class="material-icons muted">{"chevron_right"}</i>
        </li>
    }
}
