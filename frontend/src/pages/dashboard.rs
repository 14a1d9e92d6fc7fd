use yew::platform::spawn_local;
use yew::prelude::*;

use common::model::{DocumentList, EvidenceList, JobList, ScanType};
use common::transform::latest_succeeded;
use common::ApiError;

use crate::app::Page;
use crate::components::compliance_score::ComplianceScore;
use crate::components::helpers::count;
use crate::components::recent_jobs::RecentJobs;
use crate::platform::ClientHandle;

#[derive(Properties, PartialEq)]
pub struct DashboardProps {
    pub client: ClientHandle,
    pub on_navigate: Callback<Page>,
}

pub enum Msg {
    Load,
    DocumentsLoaded(Result<DocumentList, ApiError>),
    JobsLoaded(Result<JobList, ApiError>),
    EvidenceLoaded(Result<EvidenceList, ApiError>),
    SetScanType(ScanType),
    RunAnalysis,
    RunFailed(ApiError),
}

/// Compliance overview: counts, the latest score, recent jobs and the
/// "Run Analysis" action over every uploaded document.
pub struct Dashboard {
    documents: Option<DocumentList>,
    jobs: Option<JobList>,
    evidence: Option<EvidenceList>,
    scan_type: ScanType,
    running: bool,
    error: Option<String>,
}

impl Component for Dashboard {
    type Message = Msg;
    type Properties = DashboardProps;

    fn create(ctx: &Context<Self>) -> Self {
        ctx.link().send_message(Msg::Load);
        Self {
            documents: None,
            jobs: None,
            evidence: None,
            scan_type: ScanType::Quick,
            running: false,
            error: None,
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::Load => {
                self.error = None;
                let client = ctx.props().client.clone();
                let link = ctx.link().clone();
                spawn_local(async move {
                    link.send_message(Msg::DocumentsLoaded(client.documents().list().await));
                });
                let client = ctx.props().client.clone();
                let link = ctx.link().clone();
                spawn_local(async move {
                    link.send_message(Msg::JobsLoaded(client.jobs().list().await));
                });
                false
            }
            Msg::DocumentsLoaded(result) => {
                match result {
                    Ok(list) => self.documents = Some(list),
                    Err(err) => self.error = Some(err.message()),
                }
                true
            }
            Msg::JobsLoaded(result) => {
                match result {
                    Ok(list) => {
                        if let Some(job) = latest_succeeded(&list.jobs) {
                            let client = ctx.props().client.clone();
                            let link = ctx.link().clone();
                            let id = job.id.clone();
                            spawn_local(async move {
                                link.send_message(Msg::EvidenceLoaded(client.jobs().evidence(&id).await));
                            });
                        }
                        self.jobs = Some(list);
                    }
                    Err(err) => self.error = Some(err.message()),
                }
                true
            }
            Msg::EvidenceLoaded(result) => {
                match result {
                    Ok(list) => self.evidence = Some(list),
                    Err(err) => log::warn!("latest evidence unavailable: {err}"),
                }
                true
            }
            Msg::SetScanType(scan_type) => {
                self.scan_type = scan_type;
                true
            }
            Msg::RunAnalysis => {
                if self.running {
                    return false;
                }
                self.running = true;
                self.error = None;
                let documents = self
                    .documents
                    .as_ref()
                    .map(|list| list.documents.clone())
                    .unwrap_or_default();
                let scan_type = self.scan_type;
                let client = ctx.props().client.clone();
                let link = ctx.link().clone();
                let on_navigate = ctx.props().on_navigate.clone();
                spawn_local(async move {
                    match client.jobs().start_analysis(&documents, scan_type).await {
                        Ok(job) => on_navigate.emit(Page::Job(job.id)),
                        Err(err) => link.send_message(Msg::RunFailed(err)),
                    }
                });
                true
            }
            Msg::RunFailed(err) => {
                self.running = false;
                self.error = Some(err.message());
                true
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let link = ctx.link();
        let on_navigate = ctx.props().on_navigate.clone();
        let document_total = self.documents.as_ref().map_or(0, |list| list.total);
        let job_total = self.jobs.as_ref().map_or(0, |list| list.total);
        let pending_review = self.evidence.as_ref().map_or(0, |list| list.needs_review);
        let has_documents = self.documents.as_ref().is_some_and(|list| !list.documents.is_empty());

        html! {
            <div class="page dashboard">
                <div class="page-header">
                    <div>
                        <h1>{"Dashboard"}</h1>
                        <p class="muted">{"SOC 2 compliance overview and quick actions"}</p>
                    </div>
                    <div class="header-actions">
                        <div class="segmented">
                            { self.scan_button(ctx, ScanType::Quick, "bolt", "Quick (8)") }
                            { self.scan_button(ctx, ScanType::Full, "shield", "Full (51)") }
                        </div>
                        <button
                            class="btn primary"
                            disabled={self.running || !has_documents}
                            onclick={link.callback(|_| Msg::RunAnalysis)}
                        >
                            <i class="material-icons">{"play_arrow"}</i>
                            { if self.running { "Starting..." } else { "Run Analysis" } }
                        </button>
                    </div>
                </div>

                {
                    if let Some(error) = &self.error {
                        html! {
                            <div class="alert alert-error">
                                <span>{ error }</span>
                                <button class="link-btn" onclick={link.callback(|_| Msg::Load)}>{"Retry"}</button>
                            </div>
                        }
                    } else {
                        html! {}
                    }
                }

                <div class="grid-3">
                    { stat_card("description", "Documents", document_total) }
                    { stat_card("play_arrow", "Analysis Runs", job_total) }
                    { stat_card("error", "Pending Review", pending_review) }
                </div>

                <div class="grid-2">
                    {
                        if let Some(evidence) = &self.evidence {
                            html! {
                                <ComplianceScore
                                    passing={evidence.passing}
                                    failing={evidence.failing}
                                    needs_review={evidence.needs_review}
                                    total={evidence.total}
                                />
                            }
                        } else {
                            let to_documents = on_navigate.reform(|_| Page::Documents);
                            html! {
                                <div class="card empty-state">
                                    <i class="material-icons muted">{"play_circle"}</i>
                                    <h3>{"No Analysis Yet"}</h3>
                                    <p class="muted">
                                        {"Upload your compliance documents and run your first analysis to see your compliance score."}
                                    </p>
                                    <button class="btn secondary" onclick={to_documents}>{"Upload Documents"}</button>
                                </div>
                            }
                        }
                    }
                    <RecentJobs
                        jobs={self.jobs.as_ref().map(|list| list.jobs.clone()).unwrap_or_default()}
                        on_select={on_navigate.reform(Page::Job)}
                    />
                </div>
            </div>
        }
    }
}

impl Dashboard {
    fn scan_button(&self, ctx: &Context<Self>, scan_type: ScanType, icon: &'static str, label: &'static str) -> Html {
        let class = if self.scan_type == scan_type { "segment active" } else { "segment" };
        html! {
            <button class={class} onclick={ctx.link().callback(move |_| Msg::SetScanType(scan_type))}>
                <i class="material-icons">{ icon }</i>
                { label }
            </button>
        }
    }
}

fn stat_card(icon: &'static str, label: &'static str, value: u32) -> Html {
    html! {
        <div class="card stat-card">
            <i class="material-icons">{ icon }</i>
            <div>
                <p class="muted">{ label }</p>
                <p class="stat-value">{ count(value) }</p>
            </div>
        </div>
    }
}
