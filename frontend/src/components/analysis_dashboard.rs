//! Results view for one finished analysis: score, per-category breakdown and
//! the filterable list of evaluated controls.

use wasm_bindgen::JsCast;
use web_sys::HtmlSelectElement;
use yew::{html, Component, Context, Event, Html, Properties};

use common::format::format_optional_date;
use common::transform::{filter_controls, AnalysisResults, CategoryBreakdown, ResultStatus};

use super::compliance_score::ComplianceScore;
use super::control_card::ControlCard;
use super::helpers::count;

#[derive(Properties, PartialEq, Clone)]
pub struct AnalysisDashboardProps {
    pub results: AnalysisResults,
}

pub enum Msg {
    SelectCategory(Option<String>),
    SelectStatus(Option<ResultStatus>),
}

pub struct AnalysisDashboard {
    category: Option<String>,
    status: Option<ResultStatus>,
}

impl Component for AnalysisDashboard {
    type Message = Msg;
    type Properties = AnalysisDashboardProps;

    fn create(_ctx: &Context<Self>) -> Self {
        Self {
            category: None,
            status: None,
        }
    }

    fn update(&mut self, _ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::SelectCategory(category) => self.category = category,
            Msg::SelectStatus(status) => self.status = status,
        }
        true
    }

    fn changed(&mut self, ctx: &Context<Self>, _old_props: &Self::Properties) -> bool {
        // A category that no longer exists would filter everything out.
        if let Some(selected) = &self.category {
            let names = ctx.props().results.category_names();
            if !names.contains(&selected.as_str()) {
                self.category = None;
            }
        }
        true
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let results = &ctx.props().results;
        let visible = filter_controls(&results.controls, self.category.as_deref(), self.status);

        html! {
            <div class="analysis-dashboard">
                <div class="grid-2">
                    <ComplianceScore
                        passing={results.passing}
                        failing={results.failing}
                        needs_review={results.needs_review}
                        total={results.total_controls}
                    />
                    <div class="card">
                        <h3>{"Analysis Summary"}</h3>
                        <div class="stat-grid">
                            { stat("Total Controls", results.total_controls, "") }
                            { stat("Passing", results.passing, "stat-pass") }
                            { stat("Failing", results.failing, "stat-fail") }
                            { stat("Needs Review", results.needs_review, "stat-review") }
                        </div>
                        <p class="muted">
                            { format!("{} - {}", results.scan_type.label(), format_optional_date(results.created_at.as_deref())) }
                        </p>
                    </div>
                </div>

                { self.category_bar(ctx) }

                <div class="filter-row">
                    <h3>{ format!("Control Evidence ({})", visible.len()) }</h3>
                    { self.status_select(ctx) }
                </div>
                <div class="control-list">
                    { for visible.into_iter().map(|result| html! {
                        <ControlCard key={result.control_id.clone()} result={result.clone()} />
                    }) }
                </div>
            </div>
        }
    }
}

impl AnalysisDashboard {
    fn category_bar(&self, ctx: &Context<Self>) -> Html {
        let results = &ctx.props().results;
        let link = ctx.link();
        let all_class = if self.category.is_none() { "chip active" } else { "chip" };

        html! {
            <div class="category-bar">
                <button class={all_class} onclick={link.callback(|_| Msg::SelectCategory(None))}>
                    {"All categories"}
                </button>
                { for results.categories.iter().map(|breakdown| self.category_chip(ctx, breakdown)) }
            </div>
        }
    }

    fn category_chip(&self, ctx: &Context<Self>, breakdown: &CategoryBreakdown) -> Html {
        let active = self.category.as_deref() == Some(breakdown.name.as_str());
        let name = breakdown.name.clone();
        html! {
            <button
                class={if active { "chip active" } else { "chip" }}
                onclick={ctx.link().callback(move |_| Msg::SelectCategory(Some(name.clone())))}
            >
                <span>{ &breakdown.name }</span>
                <span class="chip-score">
                    { format!("{}/{} ({}%)", breakdown.passing, breakdown.total, breakdown.score()) }
                </span>
            </button>
        }
    }

    fn status_select(&self, ctx: &Context<Self>) -> Html {
        let onchange = ctx.link().callback(|event: Event| {
            let value = event
                .target()
                .and_then(|target| target.dyn_into::<HtmlSelectElement>().ok())
                .map(|select| select.value())
                .unwrap_or_default();
            Msg::SelectStatus(match value.as_str() {
                "pass" => Some(ResultStatus::Pass),
                "fail" => Some(ResultStatus::Fail),
                "needs_review" => Some(ResultStatus::NeedsReview),
                _ => None,
            })
        });
        let selected = self.status.map(|s| s.as_str()).unwrap_or("all");

        html! {
            <select class="status-filter" {onchange}>
                <option value="all" selected={selected == "all"}>{"All statuses"}</option>
                <option value="pass" selected={selected == "pass"}>{"Pass"}</option>
                <option value="fail" selected={selected == "fail"}>{"Fail"}</option>
                <option value="needs_review" selected={selected == "needs_review"}>{"Needs Review"}</option>
            </select>
        }
    }
}

fn stat(label: &'static str, value: u32, class: &'static str) -> Html {
    html! {
        <div class={format!("stat {class}")}>
            <p class="muted">{ label }</p>
            <p class="stat-value">{ count(value) }</p>
        </div>
    }
}
