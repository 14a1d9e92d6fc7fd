use wasm_bindgen::JsCast;
use web_sys::{HtmlInputElement, HtmlSelectElement};
use yew::platform::spawn_local;
use yew::prelude::*;

use common::model::{CheckType, Control, ControlCategories, ControlList, ControlSummary, ScanType};
use common::transform::search_controls;
use common::ApiError;

use crate::platform::ClientHandle;

#[derive(Properties, PartialEq)]
pub struct ControlsProps {
    pub client: ClientHandle,
}

pub enum Msg {
    Load,
    ControlsLoaded(Result<ControlList, ApiError>),
    CategoriesLoaded(Result<ControlCategories, ApiError>),
    SummaryLoaded(Result<ControlSummary, ApiError>),
    SetScanType(ScanType),
    Search(String),
    SelectCategory(Option<String>),
    Expand(String),
}

/// Read-only browser over the SOC 2 control catalogue.
pub struct Controls {
    scan_type: ScanType,
    controls: Option<ControlList>,
    categories: Option<ControlCategories>,
    summary: Option<ControlSummary>,
    query: String,
    category: Option<String>,
    expanded: Option<String>,
    error: Option<String>,
}

impl Component for Controls {
    type Message = Msg;
    type Properties = ControlsProps;

    fn create(ctx: &Context<Self>) -> Self {
        ctx.link().send_message(Msg::Load);
        Self {
            scan_type: ScanType::Full,
            controls: None,
            categories: None,
            summary: None,
            query: String::new(),
            category: None,
            expanded: None,
            error: None,
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::Load => {
                self.error = None;
                self.load_controls(ctx);
                let client = ctx.props().client.clone();
                let link = ctx.link().clone();
                spawn_local(async move {
                    let controls = client.controls();
                    link.send_message(Msg::CategoriesLoaded(controls.categories().await));
                    link.send_message(Msg::SummaryLoaded(controls.summary().await));
                });
                true
            }
            Msg::ControlsLoaded(result) => {
                match result {
                    Ok(list) => self.controls = Some(list),
                    Err(err) => self.error = Some(err.message()),
                }
                true
            }
            Msg::CategoriesLoaded(result) => {
                match result {
                    Ok(categories) => self.categories = Some(categories),
                    Err(err) => log::warn!("control categories unavailable: {err}"),
                }
                true
            }
            Msg::SummaryLoaded(result) => {
                match result {
                    Ok(summary) => self.summary = Some(summary),
                    Err(err) => log::warn!("control summary unavailable: {err}"),
                }
                true
            }
            Msg::SetScanType(scan_type) => {
                if self.scan_type == scan_type {
                    return false;
                }
                self.scan_type = scan_type;
                self.controls = None;
                self.load_controls(ctx);
                true
            }
            Msg::Search(query) => {
                self.query = query;
                true
            }
            Msg::SelectCategory(category) => {
                self.category = if self.category == category { None } else { category };
                true
            }
            Msg::Expand(control_id) => {
                self.expanded = if self.expanded.as_deref() == Some(control_id.as_str()) {
                    None
                } else {
                    Some(control_id)
                };
                true
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let link = ctx.link();
        let full_count = self.summary.as_ref().map_or(51, |s| s.full_scan_count);
        let quick_count = self.summary.as_ref().map_or(8, |s| s.quick_scan_count);
        let oninput = link.callback(|event: InputEvent| {
            Msg::Search(
                event
                    .target()
                    .and_then(|t| t.dyn_into::<HtmlInputElement>().ok())
                    .map(|input| input.value())
                    .unwrap_or_default(),
            )
        });
        let onchange = link.callback(|event: Event| {
            let value = event
                .target()
                .and_then(|t| t.dyn_into::<HtmlSelectElement>().ok())
                .map(|select| select.value())
                .unwrap_or_default();
            Msg::SelectCategory(Some(value).filter(|v| !v.is_empty()))
        });

        html! {
            <div class="page controls">
                <div class="page-header">
                    <div>
                        <h1>{"SOC 2 Controls Reference"}</h1>
                        <p class="muted">{"Complete guide to SOC 2 Trust Service Criteria"}</p>
                    </div>
                    <div class="segmented">
                        { self.scan_button(ctx, ScanType::Quick, format!("Quick Scan ({quick_count})")) }
                        { self.scan_button(ctx, ScanType::Full, format!("Full Scan ({full_count})")) }
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

                <div class="card filter-row">
                    <input
                        type="text"
                        placeholder="Search controls by ID, title, or description..."
                        value={self.query.clone()}
                        {oninput}
                    />
                    <select {onchange}>
                        <option value="" selected={self.category.is_none()}>{"All Categories"}</option>
                        { for self.categories.iter().flat_map(|c| c.categories.iter()).map(|category| html! {
                            <option
                                value={category.name.clone()}
                                selected={self.category.as_deref() == Some(category.name.as_str())}
                            >
                                { format!("{} ({})", category.name, category.count) }
                            </option>
                        }) }
                    </select>
                </div>

                { self.category_cards(ctx) }
                { self.control_list(ctx) }
            </div>
        }
    }
}

impl Controls {
    fn load_controls(&self, ctx: &Context<Self>) {
        let client = ctx.props().client.clone();
        let link = ctx.link().clone();
        let scan_type = self.scan_type;
        spawn_local(async move {
            let framework = client.config().framework.clone();
            link.send_message(Msg::ControlsLoaded(
                client.controls().list(&framework, scan_type).await,
            ));
        });
    }

    fn scan_button(&self, ctx: &Context<Self>, scan_type: ScanType, label: String) -> Html {
        let class = if self.scan_type == scan_type { "segment active" } else { "segment" };
        html! {
            <button class={class} onclick={ctx.link().callback(move |_| Msg::SetScanType(scan_type))}>
                { label }
            </button>
        }
    }

    fn category_cards(&self, ctx: &Context<Self>) -> Html {
        let Some(categories) = &self.categories else {
            return html! {};
        };
        html! {
            <div class="grid-3">
                { for categories.categories.iter().map(|category| {
                    let selected = self.category.as_deref() == Some(category.name.as_str());
                    let name = category.name.clone();
                    html! {
                        <div
                            class={if selected { "card category-card selected" } else { "card category-card" }}
                            onclick={ctx.link().callback(move |_| Msg::SelectCategory(Some(name.clone())))}
                        >
                            <h3>{ &category.name }</h3>
                            <p class="muted">{ format!("{} controls", category.count) }</p>
                        </div>
                    }
                }) }
            </div>
        }
    }

    fn control_list(&self, ctx: &Context<Self>) -> Html {
        let Some(list) = &self.controls else {
            return html! { <div class="spinner">{"Loading controls..."}</div> };
        };
        let found = search_controls(&list.controls, &self.query, self.category.as_deref());

        html! {
            <div class="card">
                <h3>{ format!("Controls ({})", found.len()) }</h3>
                {
                    if found.is_empty() {
                        html! { <p class="muted empty-state">{"No controls match your filters"}</p> }
                    } else {
                        html! {
                            <ul class="divided">
                                { for found.into_iter().map(|control| self.control_row(ctx, control)) }
                            </ul>
                        }
                    }
                }
            </div>
        }
    }

    fn control_row(&self, ctx: &Context<Self>, control: &Control) -> Html {
        let expanded = self.expanded.as_deref() == Some(control.control_id.as_str());
        let id = control.control_id.clone();
        let check = match control.check_type {
            CheckType::AiPrompt => "AI analysis",
            CheckType::Deterministic => "Automated check",
            CheckType::Unknown => "Manual review",
        };
        html! {
            <li class="control-row clickable" key={control.control_id.clone()}
                onclick={ctx.link().callback(move |_| Msg::Expand(id.clone()))}>
                <div class="control-row-header">
                    <span class="control-id">{ &control.control_id }</span>
                    <span>{ &control.title }</span>
                    <span class="badge">{ &control.category }</span>
                    <span class="muted">{ check }</span>
                </div>
                {
                    if expanded {
                        html! {
                            <div class="control-details">
                                <p>{ &control.description }</p>
                                {
                                    if let Some(types) = &control.required_file_types {
                                        html! { <p class="muted">{ format!("Evidence file types: {types}") }</p> }
                                    } else {
                                        html! {}
                                    }
                                }
                            </div>
                        }
                    } else {
                        html! {}
                    }
                }
            </li>
        }
    }
}
