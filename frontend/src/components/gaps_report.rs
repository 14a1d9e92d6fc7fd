use yew::{html, Component, Context, Html, Properties};

use common::model::{Gap, Severity};
use common::transform::GapReport;

use super::helpers::markdown;

#[derive(Properties, PartialEq, Clone)]
pub struct GapsReportProps {
    pub gaps: Vec<Gap>,
}

/// Gaps of one job, most severe first.
pub struct GapsReport {
    report: GapReport,
}

impl Component for GapsReport {
    type Message = ();
    type Properties = GapsReportProps;

    fn create(ctx: &Context<Self>) -> Self {
        Self {
            report: GapReport::new(&ctx.props().gaps),
        }
    }

    fn changed(&mut self, ctx: &Context<Self>, _old_props: &Self::Properties) -> bool {
        self.report = GapReport::new(&ctx.props().gaps);
        true
    }

    fn view(&self, _ctx: &Context<Self>) -> Html {
        if self.report.is_empty() {
            return html! {
                <div class="card empty-state">
                    <i class="material-icons status-pass">{"verified"}</i>
                    <h3>{"No Gaps Found"}</h3>
                    <p class="muted">{"All controls are passing or need review."}</p>
                </div>
            };
        }

        html! {
            <div class="card gaps-report">
                <div class="card-header-row">
                    <h3>{ format!("Compliance Gaps ({})", self.report.gaps.len()) }</h3>
                    <div class="severity-counts">
                        { self.severity_badge(Severity::Critical) }
                        { self.severity_badge(Severity::High) }
                    </div>
                </div>
                <ul class="divided">
                    { for self.report.gaps.iter().map(gap_row) }
                </ul>
            </div>
        }
    }
}

impl GapsReport {
    fn severity_badge(&self, severity: Severity) -> Html {
        let n = self.report.count(severity);
        if n == 0 {
            return html! {};
        }
        html! {
            <span class={format!("badge severity-{}", severity.as_str())}>
                { format!("{n} {}", severity.label()) }
            </span>
        }
    }
}

fn gap_row(gap: &Gap) -> Html {
    html! {
        <li class="gap-row" key={gap.id.clone()}>
            <span class={format!("badge severity-{}", gap.severity.as_str())}>
                { gap.severity.as_str().to_uppercase() }
            </span>
            <div>
                <span class="control-id">{ &gap.control_id }</span>
                <p>{ &gap.description }</p>
                {
                    if let Some(remediation) = &gap.remediation_suggestion {
                        html! {
                            <div class="remediation">
                                <strong>{"Remediation:"}</strong>
                                { markdown(remediation) }
                            </div>
                        }
                    } else {
                        html! {}
                    }
                }
            </div>
        </li>
    }
}
