use wasm_bindgen::JsCast;
use web_sys::HtmlAnchorElement;
use yew::platform::spawn_local;
use yew::prelude::*;

use common::demo::{demo_analysis, DemoAnalysis, RemediationTask};
use common::ApiError;

use crate::components::analysis_dashboard::AnalysisDashboard;
use crate::components::compliance_score::ComplianceScore;
use crate::components::gaps_report::GapsReport;
use crate::components::helpers::{count, show_toast};
use crate::platform::ClientHandle;

const REPORT_FILE: &str = "ShieldAgent_Demo_Report.pdf";
const URL_LIFETIME_MS: u32 = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Dashboard,
    Controls,
    Remediation,
    Report,
}

impl Tab {
    const ALL: [Tab; 4] = [Tab::Dashboard, Tab::Controls, Tab::Remediation, Tab::Report];

    fn label(&self) -> &'static str {
        match self {
            Tab::Dashboard => "Dashboard",
            Tab::Controls => "Controls",
            Tab::Remediation => "Remediation Plan",
            Tab::Report => "Report",
        }
    }

    fn icon(&self) -> &'static str {
        match self {
            Tab::Dashboard => "dashboard",
            Tab::Controls => "verified_user",
            Tab::Remediation => "build",
            Tab::Report => "picture_as_pdf",
        }
    }
}

#[derive(Properties, PartialEq)]
pub struct DemoProps {
    pub client: ClientHandle,
    pub on_exit: Callback<()>,
}

pub enum Msg {
    SelectTab(Tab),
    Download,
    Downloaded(Result<Vec<u8>, ApiError>),
}

/// Guided tour over a fixed sample analysis. Nothing here touches the
/// user's data; only the report tab calls the backend.
pub struct Demo {
    tab: Tab,
    analysis: DemoAnalysis,
    downloading: bool,
    error: Option<String>,
}

impl Component for Demo {
    type Message = Msg;
    type Properties = DemoProps;

    fn create(_ctx: &Context<Self>) -> Self {
        Self {
            tab: Tab::Dashboard,
            analysis: demo_analysis(),
            downloading: false,
            error: None,
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::SelectTab(tab) => {
                if self.tab == tab {
                    return false;
                }
                self.tab = tab;
                true
            }
            Msg::Download => {
                if self.downloading {
                    return false;
                }
                self.downloading = true;
                self.error = None;
                let client = ctx.props().client.clone();
                let organization = self.analysis.organization.clone();
                let link = ctx.link().clone();
                spawn_local(async move {
                    let result = client.reports().demo(&organization).await;
                    link.send_message(Msg::Downloaded(result));
                });
                true
            }
            Msg::Downloaded(result) => {
                self.downloading = false;
                match result.and_then(|bytes| save_pdf(bytes, REPORT_FILE)) {
                    Ok(()) => show_toast("Demo report downloaded"),
                    Err(err) => {
                        log::warn!("demo report failed: {err}");
                        self.error = Some(err.message());
                    }
                }
                true
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let link = ctx.link();
        html! {
            <div class="demo">
                <div class="page-header">
                    <div>
                        <h1>{"Demo Mode"}</h1>
                        <p class="muted">
                            { format!("Sample SOC 2 analysis for {}", self.analysis.organization) }
                        </p>
                    </div>
                    <button class="btn" onclick={ctx.props().on_exit.reform(|_| ())}>
                        <i class="material-icons">{"close"}</i>
                        {"Exit demo"}
                    </button>
                </div>

                <div class="tabs">
                    { for Tab::ALL.iter().map(|&tab| html! {
                        <button
                            class={if tab == self.tab { "tab active" } else { "tab" }}
                            onclick={link.callback(move |_| Msg::SelectTab(tab))}
                        >
                            <i class="material-icons">{ tab.icon() }</i>
                            { tab.label() }
                        </button>
                    }) }
                </div>

                {
                    match self.tab {
                        Tab::Dashboard => self.view_dashboard(),
                        Tab::Controls => html! {
                            <>
                                <AnalysisDashboard results={self.analysis.results.clone()} />
                                <GapsReport gaps={self.analysis.gaps.clone()} />
                            </>
                        },
                        Tab::Remediation => self.view_plan(),
                        Tab::Report => self.view_report(ctx),
                    }
                }
            </div>
        }
    }
}

impl Demo {
    fn view_dashboard(&self) -> Html {
        let results = &self.analysis.results;
        let risk = self.analysis.risk_level();
        html! {
            <>
                <ComplianceScore
                    passing={results.passing}
                    failing={results.failing}
                    needs_review={results.needs_review}
                    total={results.total_controls}
                />
                <div class="stat-grid">
                    <div class="card stat">
                        <span class="muted">{"Risk Level"}</span>
                        <span class={risk.css_class()}>{ risk.label() }</span>
                    </div>
                    <div class="card stat">
                        <span class="muted">{"Audit Readiness"}</span>
                        <strong>{ self.analysis.readiness().label() }</strong>
                    </div>
                    <div class="card stat">
                        <span class="muted">{"Remediation Effort"}</span>
                        <strong>{ format!("{} hours", count(self.analysis.plan.total_hours())) }</strong>
                    </div>
                </div>
                <div class="card">
                    <h3>{"Categories"}</h3>
                    { for results.categories.iter().map(|category| html! {
                        <div class="category-row">
                            <span>{ &category.name }</span>
                            <div class="progress">
                                <div class="progress-bar" style={format!("width: {}%", category.score())} />
                            </div>
                            <span class="muted">{ format!("{}/{}", category.passing, category.total) }</span>
                        </div>
                    }) }
                </div>
                <div class="card">
                    <h3>{"Recommendations"}</h3>
                    <ul class="recommendations">
                        { for self.analysis.recommendations.iter().map(|line| html! { <li>{ line }</li> }) }
                    </ul>
                </div>
            </>
        }
    }

    fn view_plan(&self) -> Html {
        let plan = &self.analysis.plan;
        html! {
            <div class="card">
                <div class="card-header-row">
                    <h3>{"Remediation Plan"}</h3>
                    <span class="muted">
                        { format!(
                            "{} of {} tasks complete ({}%)",
                            plan.completed_tasks(),
                            plan.total_tasks(),
                            plan.progress_percent()
                        ) }
                    </span>
                </div>
                <div class="progress">
                    <div class="progress-bar" style={format!("width: {}%", plan.progress_percent())} />
                </div>
                <ul class="task-list">
                    { for plan.tasks.iter().map(task_row) }
                </ul>
            </div>
        }
    }

    fn view_report(&self, ctx: &Context<Self>) -> Html {
        html! {
            <div class="card">
                <h3>{"Compliance Report"}</h3>
                <p class="muted">
                    {"Download the PDF report a real analysis produces, generated for the sample organization."}
                </p>
                if let Some(error) = &self.error {
                    <div class="alert alert-error">{ error }</div>
                }
                <button
                    class="btn btn-primary"
                    disabled={self.downloading}
                    onclick={ctx.link().callback(|_| Msg::Download)}
                >
                    <i class="material-icons">{"download"}</i>
                    { if self.downloading { "Generating..." } else { "Download PDF" } }
                </button>
            </div>
        }
    }
}

fn task_row(task: &RemediationTask) -> Html {
    html! {
        <li class="task">
            <i class="material-icons">{ task.status.icon() }</i>
            <div class="task-body">
                <strong>{ &task.title }</strong>
                <span class="muted">{ format!("{} · {} hours · due in {}", task.control_id, task.estimated_hours, task.due) }</span>
            </div>
            <span class={format!("badge severity-{}", task.priority.as_str())}>
                { task.priority.label() }
            </span>
        </li>
    }
}

/// Hands `bytes` to the browser as a PDF download. The object URL is revoked
/// once the download had time to start.
fn save_pdf(bytes: Vec<u8>, file_name: &str) -> Result<(), ApiError> {
    let not_saved = || ApiError::validation("Could not save the report");
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(not_saved)?;
    let anchor: HtmlAnchorElement = document
        .create_element("a")
        .ok()
        .and_then(|element| element.dyn_into().ok())
        .ok_or_else(not_saved)?;

    let blob = gloo_file::Blob::new_with_options(bytes.as_slice(), Some("application/pdf"));
    let url = gloo_file::ObjectUrl::from(blob);
    anchor.set_href(&url);
    anchor.set_download(file_name);
    anchor.click();
    spawn_local(async move {
        gloo_timers::future::TimeoutFuture::new(URL_LIFETIME_MS).await;
        drop(url);
    });
    Ok(())
}
