use yew::{html, Callback, Component, Context, Html};

use common::model::User;

use crate::components::helpers::show_toast;
use crate::components::onboarding::Onboarding;
use crate::pages::controls::Controls;
use crate::pages::dashboard::Dashboard;
use crate::pages::demo::Demo;
use crate::pages::documents::Documents;
use crate::pages::job_details::JobDetails;
use crate::pages::login::Login;
use crate::platform::ClientHandle;

/// Screen currently shown by the root component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Page {
    Dashboard,
    Documents,
    Controls,
    Job(String),
    /// Tour over sample results; reachable signed in or not.
    Demo,
}

pub enum Msg {
    Navigate(Page),
    LoggedIn(User),
    Logout,
    SessionExpired,
    FinishOnboarding,
}

pub struct App {
    client: ClientHandle,
    page: Page,
    user: Option<User>,
    show_onboarding: bool,
}

impl Component for App {
    type Message = Msg;
    type Properties = ();

    fn create(ctx: &Context<Self>) -> Self {
        let client = ClientHandle::new();
        let expired = ctx.link().callback(|_: ()| Msg::SessionExpired);
        client.api().on_session_expired(move || expired.emit(()));
        let session = client.session();
        let user = session.user().filter(|_| session.is_authenticated());
        let show_onboarding = !session.onboarding_complete();
        Self {
            client,
            page: Page::Dashboard,
            user,
            show_onboarding,
        }
    }

    fn update(&mut self, _ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::Navigate(page) => {
                if self.page == page {
                    return false;
                }
                log::debug!("navigate to {page:?}");
                self.page = page;
                true
            }
            Msg::LoggedIn(user) => {
                log::info!("signed in as {}", user.email);
                self.user = Some(user);
                self.page = Page::Dashboard;
                self.show_onboarding = !self.client.session().onboarding_complete();
                true
            }
            Msg::Logout => {
                self.client.auth().logout();
                self.user = None;
                self.page = Page::Dashboard;
                true
            }
            Msg::SessionExpired => {
                if self.user.is_none() {
                    return false;
                }
                self.client.auth().logout();
                self.user = None;
                self.page = Page::Dashboard;
                show_toast("Your session has expired. Please sign in again.");
                true
            }
            Msg::FinishOnboarding => {
                self.client.session().complete_onboarding();
                self.show_onboarding = false;
                true
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let link = ctx.link();
        let on_exit_demo = link.callback(|_: ()| Msg::Navigate(Page::Dashboard));
        let Some(user) = &self.user else {
            if self.page == Page::Demo {
                return html! {
                    <main class="content">
                        <Demo client={self.client.clone()} on_exit={on_exit_demo} />
                    </main>
                };
            }
            return html! {
                <>
                    <Login client={self.client.clone()} on_login={link.callback(Msg::LoggedIn)} />
                    <div class="demo-entry">
                        <button class="link-btn" onclick={link.callback(|_| Msg::Navigate(Page::Demo))}>
                            <i class="material-icons">{"play_circle"}</i>
                            {"Try Demo Mode"}
                        </button>
                    </div>
                </>
            };
        };
        let on_navigate: Callback<Page> = link.callback(Msg::Navigate);

        html! {
            <div class="app">
                <nav class="navbar">
                    <span class="brand">
                        <i class="material-icons">{"shield"}</i>
                        {"ShieldAgent"}
                    </span>
                    { self.nav_link(ctx, Page::Dashboard, "dashboard", "Dashboard") }
                    { self.nav_link(ctx, Page::Documents, "description", "Documents") }
                    { self.nav_link(ctx, Page::Controls, "verified_user", "Controls") }
                    <span class="spacer"></span>
                    <button class="btn btn-outline" onclick={link.callback(|_| Msg::Navigate(Page::Demo))}>
                        <i class="material-icons">{"play_circle"}</i>
                        {"Try Demo Mode"}
                    </button>
                    <span class="muted">{ user.display_name().to_string() }</span>
                    <button class="link-btn" onclick={link.callback(|_| Msg::Logout)}>
                        <i class="material-icons">{"logout"}</i>
                        {"Sign out"}
                    </button>
                </nav>

                <main class="content">
                    {
                        match &self.page {
                            Page::Dashboard => html! {
                                <Dashboard client={self.client.clone()} on_navigate={on_navigate.clone()} />
                            },
                            Page::Documents => html! { <Documents client={self.client.clone()} /> },
                            Page::Controls => html! { <Controls client={self.client.clone()} /> },
                            Page::Demo => html! {
                                <Demo client={self.client.clone()} on_exit={on_exit_demo} />
                            },
                            Page::Job(id) => html! {
                                <JobDetails
                                    client={self.client.clone()}
                                    job_id={id.clone()}
                                    on_navigate={on_navigate.clone()}
                                />
                            },
                        }
                    }
                </main>

                {
                    if self.show_onboarding {
                        html! { <Onboarding on_finish={link.callback(|_| Msg::FinishOnboarding)} /> }
                    } else {
                        html! {}
                    }
                }
            </div>
        }
    }
}

impl App {
    fn nav_link(&self, ctx: &Context<Self>, page: Page, icon: &'static str, label: &'static str) -> Html {
        let active = match (&self.page, &page) {
            (Page::Job(_), Page::Dashboard) => true,
            (current, target) => current == target,
        };
        html! {
            <button
                class={if active { "nav-link active" } else { "nav-link" }}
                onclick={ctx.link().callback(move |_| Msg::Navigate(page.clone()))}
            >
                <i class="material-icons">{ icon }</i>
                { label }
            </button>
        }
    }
}
