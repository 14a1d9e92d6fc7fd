use yew::{html, Component, Context, Html, Properties};

use common::transform::{compliance_score, ScoreBand};

use super::helpers::count;

#[derive(Properties, PartialEq, Clone)]
pub struct ComplianceScoreProps {
    pub passing: u32,
    pub failing: u32,
    pub needs_review: u32,
    pub total: u32,
}

/// Score card: percentage of passing controls with a ring chart and legend.
pub struct ComplianceScore;

impl Component for ComplianceScore {
    type Message = ();
    type Properties = ComplianceScoreProps;

    fn create(_ctx: &Context<Self>) -> Self {
        ComplianceScore
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let props = ctx.props();
        let score = compliance_score(props.passing, props.total);
        let band = ScoreBand::for_score(score);

        html! {
            <div class="card compliance-score">
                <div class="card-header-row">
                    <div>
                        <h3>{"Compliance Score"}</h3>
                        <p class="muted">{ format!("Based on {} controls", count(props.total)) }</p>
                    </div>
                    <div class={classes_for(band)}>{ format!("{score}%") }</div>
                </div>
                <div class="score-body">
                    <div class="score-ring" style={ring_style(props)} />
                    <ul class="score-legend">
                        { legend_row("check_circle", "legend-pass", "Passing", props.passing) }
                        { legend_row("cancel", "legend-fail", "Failing", props.failing) }
                        { legend_row("error", "legend-review", "Needs Review", props.needs_review) }
                    </ul>
                </div>
            </div>
        }
    }
}

fn classes_for(band: ScoreBand) -> String {
    format!("score-value {}", band.css_class())
}

fn legend_row(icon: &'static str, class: &'static str, label: &'static str, value: u32) -> Html {
    html! {
        <li class={class}>
            <i class="material-icons">{ icon }</i>
            <span class="legend-label">{ label }</span>
            <span class="legend-value">{ count(value) }</span>
        </li>
    }
}

/// Conic-gradient ring split into pass/fail/review arcs.
fn ring_style(props: &ComplianceScoreProps) -> String {
    let sum = props.passing + props.failing + props.needs_review;
    if sum == 0 {
        return "background: #e5e7eb;".to_string();
    }
    let pass = props.passing as f64 * 100.0 / sum as f64;
    let fail = pass + props.failing as f64 * 100.0 / sum as f64;
    format!(
        "background: conic-gradient(#22c55e 0 {pass:.1}%, #ef4444 {pass:.1}% {fail:.1}%, #f59e0b {fail:.1}% 100%);"
    )
}
