use yew::{html, Callback, Component, Context, Html, NodeRef, Properties};

use crate::tops_sheet::yw_material_top_sheet::{close_top_sheet, open_top_sheet, YwMaterialTopSheet};

struct Step {
    icon: &'static str,
    title: &'static str,
    description: &'static str,
}

const STEPS: [Step; 5] = [
    Step {
        icon: "shield",
        title: "Welcome to ShieldAgent",
        description: "Your AI-powered SOC 2 compliance automation platform. Streamline your compliance journey with intelligent document analysis.",
    },
    Step {
        icon: "upload_file",
        title: "Upload Your Documents",
        description: "Start by uploading your security policies, procedures, and compliance documents. We support PDF, CSV, JSON, and text files.",
    },
    Step {
        icon: "auto_awesome",
        title: "AI-Powered Analysis",
        description: "Our AI analyzes your documents against SOC 2 Trust Service Criteria, identifying evidence and gaps automatically.",
    },
    Step {
        icon: "insights",
        title: "Review Your Results",
        description: "Get a comprehensive compliance dashboard showing your score, evidence found, and actionable recommendations.",
    },
    Step {
        icon: "rocket_launch",
        title: "Ready to Start!",
        description: "You're all set to begin your compliance journey. Upload your first document and run your initial analysis.",
    },
];

#[derive(Properties, PartialEq)]
pub struct OnboardingProps {
    /// Fired when the tour is finished or skipped.
    pub on_finish: Callback<()>,
}

pub enum Msg {
    Next,
    Back,
    Finish,
}

/// First-run tour shown in a top sheet until the user finishes or skips it.
pub struct Onboarding {
    step: usize,
    sheet_ref: NodeRef,
}

impl Component for Onboarding {
    type Message = Msg;
    type Properties = OnboardingProps;

    fn create(_ctx: &Context<Self>) -> Self {
        Self {
            step: 0,
            sheet_ref: NodeRef::default(),
        }
    }

    fn rendered(&mut self, _ctx: &Context<Self>, first_render: bool) {
        if first_render {
            open_top_sheet(self.sheet_ref.clone());
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::Next if self.step + 1 < STEPS.len() => {
                self.step += 1;
                true
            }
            Msg::Back if self.step > 0 => {
                self.step -= 1;
                true
            }
            Msg::Next | Msg::Finish => {
                close_top_sheet(self.sheet_ref.clone());
                ctx.props().on_finish.emit(());
                false
            }
            Msg::Back => false,
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let link = ctx.link();
        let step = &STEPS[self.step];
        let last = self.step + 1 == STEPS.len();

        html! {
            <YwMaterialTopSheet node_ref={self.sheet_ref.clone()}>
                <div class="onboarding">
                    <i class="material-icons onboarding-icon">{ step.icon }</i>
                    <h2>{ step.title }</h2>
                    <p>{ step.description }</p>
                    <div class="onboarding-dots">
                        { for (0..STEPS.len()).map(|i| html! {
                            <span class={if i == self.step { "dot active" } else { "dot" }} />
                        }) }
                    </div>
                    <div class="onboarding-actions">
                        {
                            if self.step > 0 {
                                html! { <button class="btn secondary" onclick={link.callback(|_| Msg::Back)}>{"Back"}</button> }
                            } else {
                                html! {}
                            }
                        }
                        <button class="btn primary" onclick={link.callback(|_| Msg::Next)}>
                            { if last { "Get Started" } else { "Next" } }
                        </button>
                    </div>
                    {
                        if last {
                            html! {}
                        } else {
                            html! { <button class="link-btn" onclick={link.callback(|_| Msg::Finish)}>{"Skip tutorial"}</button> }
                        }
                    }
                </div>
            </YwMaterialTopSheet>
        }
    }
}
