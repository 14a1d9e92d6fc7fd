use wasm_bindgen::JsCast;
use web_sys::HtmlInputElement;
use yew::platform::spawn_local;
use yew::prelude::*;

use common::model::User;
use common::requests::{LoginRequest, RegisterRequest};
use common::ApiError;

use crate::platform::ClientHandle;

#[derive(Properties, PartialEq)]
pub struct LoginProps {
    pub client: ClientHandle,
    pub on_login: Callback<User>,
}

#[derive(Clone, Copy, PartialEq)]
enum Mode {
    SignIn,
    Register,
}

pub enum Msg {
    SetEmail(String),
    SetPassword(String),
    SetFullName(String),
    ToggleMode,
    Submit,
    Failed(ApiError),
}

pub struct Login {
    mode: Mode,
    email: String,
    password: String,
    full_name: String,
    error: Option<String>,
    busy: bool,
}

impl Component for Login {
    type Message = Msg;
    type Properties = LoginProps;

    fn create(_ctx: &Context<Self>) -> Self {
        Self {
            mode: Mode::SignIn,
            email: String::new(),
            password: String::new(),
            full_name: String::new(),
            error: None,
            busy: false,
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::SetEmail(value) => self.email = value,
            Msg::SetPassword(value) => self.password = value,
            Msg::SetFullName(value) => self.full_name = value,
            Msg::ToggleMode => {
                self.mode = match self.mode {
                    Mode::SignIn => Mode::Register,
                    Mode::Register => Mode::SignIn,
                };
                self.error = None;
            }
            Msg::Submit => {
                if self.busy {
                    return false;
                }
                self.busy = true;
                self.error = None;
                self.submit(ctx);
            }
            Msg::Failed(err) => {
                self.busy = false;
                self.error = Some(err.message());
            }
        }
        true
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let link = ctx.link();
        let registering = self.mode == Mode::Register;
        let onsubmit = link.callback(|event: SubmitEvent| {
            event.prevent_default();
            Msg::Submit
        });

        html! {
            <div class="login-page">
                <form class="card login-card" {onsubmit}>
                    <i class="material-icons brand-icon">{"shield"}</i>
                    <h1>{"ShieldAgent"}</h1>
                    <p class="muted">
                        { if registering { "Create your account" } else { "Sign in to your account" } }
                    </p>
                    {
                        if let Some(error) = &self.error {
                            html! { <div class="alert alert-error">{ error }</div> }
                        } else {
                            html! {}
                        }
                    }
                    {
                        if registering {
                            text_field("Full name", "text", &self.full_name, link.callback(Msg::SetFullName))
                        } else {
                            html! {}
                        }
                    }
                    { text_field("Email", "email", &self.email, link.callback(Msg::SetEmail)) }
                    { text_field("Password", "password", &self.password, link.callback(Msg::SetPassword)) }
                    <button class="btn primary" type="submit" disabled={self.busy}>
                        { if registering { "Create account" } else { "Sign in" } }
                    </button>
                    <button class="link-btn" type="button" onclick={link.callback(|_| Msg::ToggleMode)}>
                        { if registering { "Already have an account? Sign in" } else { "Need an account? Register" } }
                    </button>
                </form>
            </div>
        }
    }
}

impl Login {
    fn submit(&self, ctx: &Context<Self>) {
        let client = ctx.props().client.clone();
        let on_login = ctx.props().on_login.clone();
        let link = ctx.link().clone();
        let login = LoginRequest {
            email: self.email.clone(),
            password: self.password.clone(),
        };
        let register = (self.mode == Mode::Register).then(|| RegisterRequest {
            email: self.email.trim().to_string(),
            password: self.password.clone(),
            full_name: Some(self.full_name.trim().to_string()).filter(|name| !name.is_empty()),
        });

        spawn_local(async move {
            let auth = client.auth();
            if let Some(register) = register {
                if let Err(err) = auth.register(&register).await {
                    link.send_message(Msg::Failed(err));
                    return;
                }
            }
            match auth.login(&login).await {
                Ok(user) => on_login.emit(user),
                Err(err) => link.send_message(Msg::Failed(err)),
            }
        });
    }
}

fn text_field(label: &'static str, kind: &'static str, value: &str, on_input: Callback<String>) -> Html {
    let oninput = on_input.reform(|event: InputEvent| {
        event
            .target()
            .and_then(|target| target.dyn_into::<HtmlInputElement>().ok())
            .map(|input| input.value())
            .unwrap_or_default()
    });
    html! {
        <label class="field">
            <span>{ label }</span>
            <input type={kind} value={value.to_string()} {oninput} required={kind != "text"} />
        </label>
    }
}
