use yew::{html, Component, Context, Html, Properties};

use common::model::CheckType;
use common::transform::{ControlResult, ResultStatus};

use super::helpers::markdown;

#[derive(Properties, PartialEq, Clone)]
pub struct ControlCardProps {
    pub result: ControlResult,
}

pub enum Msg {
    Toggle,
}

/// One evaluated control, collapsed to its headline until expanded.
pub struct ControlCard {
    expanded: bool,
}

impl Component for ControlCard {
    type Message = Msg;
    type Properties = ControlCardProps;

    fn create(_ctx: &Context<Self>) -> Self {
        Self { expanded: false }
    }

    fn update(&mut self, _ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::Toggle => {
                self.expanded = !self.expanded;
                true
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let result = &ctx.props().result;
        let (icon, class) = match result.status {
            ResultStatus::Pass => ("check_circle", "status-pass"),
            ResultStatus::Fail => ("cancel", "status-fail"),
            ResultStatus::NeedsReview => ("error", "status-review"),
        };
        let check_icon = match result.check_type {
            Some(CheckType::AiPrompt) => "auto_awesome",
            _ => "settings",
        };

        html! {
            <div class="card control-card">
                <div class="control-card-header">
                    <i class={format!("material-icons {class}")}>{ icon }</i>
                    <div class="control-card-title">
                        <span class="control-id">{ &result.control_id }</span>
                        <i class="material-icons check-type">{ check_icon }</i>
                        <h4>{ &result.title }</h4>
                        <span class="muted">{ &result.category }</span>
                    </div>
                    <span class={format!("badge {class}")}>{ result.status.label() }</span>
                    <span class="muted confidence">
                        { format!("{}% confidence", result.confidence_percent()) }
                    </span>
                </div>
                {
                    if let Some(summary) = &result.summary {
                        html! { <div class="control-summary">{ markdown(summary) }</div> }
                    } else {
                        html! {}
                    }
                }
                <button class="link-btn" onclick={ctx.link().callback(|_| Msg::Toggle)}>
                    { if self.expanded { "Hide details" } else { "Show details" } }
                </button>
                { if self.expanded { details(result) } else { html! {} } }
            </div>
        }
    }
}

fn details(result: &ControlResult) -> Html {
    html! {
        <div class="control-details">
            {
                if let Some(quote) = &result.evidence_quote {
                    html! {
                        <section>
                            <h5>{"Evidence Quote"}</h5>
                            <blockquote>{ format!("\"{quote}\"") }</blockquote>
                        </section>
                    }
                } else {
                    html! {}
                }
            }
            {
                if let Some(source) = &result.source_location {
                    html! { <section><h5>{"Source"}</h5><p>{ source }</p></section> }
                } else {
                    html! {}
                }
            }
            {
                if let Some(description) = &result.description {
                    html! { <section><h5>{"Control Description"}</h5><p>{ description }</p></section> }
                } else {
                    html! {}
                }
            }
            {
                if result.gaps.is_empty() {
                    html! {}
                } else {
                    html! {
                        <section>
                            <h5>{"Gaps"}</h5>
                            <ul>{ for result.gaps.iter().map(|gap| html! { <li>{ gap }</li> }) }</ul>
                        </section>
                    }
                }
            }
        </div>
    }
}
