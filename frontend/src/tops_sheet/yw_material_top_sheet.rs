use uuid::Uuid;
use yew::{html, Component, Context, Html, NodeRef, Properties};

/// Sliding sheet anchored to the top of the viewport. Hidden until
/// `open_top_sheet` adds the `show` class to it.
pub struct YwMaterialTopSheet {
    pub id: String,
}

#[derive(Properties, PartialEq)]
pub struct Props {
    #[prop_or_default]
    pub children: Html,
    pub node_ref: NodeRef,
}

impl Component for YwMaterialTopSheet {
    type Message = ();
    type Properties = Props;

    fn create(_ctx: &Context<Self>) -> Self {
        Self {
            id: format!("id-{}", Uuid::new_v4()),
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        html! {
            <div class="top-sheet" id={self.id.clone()} ref={ctx.props().node_ref.clone()}>
                { ctx.props().children.clone() }
            </div>
        }
    }
}

const SHOW_CLASS: &str = "show";

pub fn open_top_sheet(top_sheet_ref: NodeRef) {
    if let Some(top_sheet) = top_sheet_ref.cast::<web_sys::HtmlElement>() {
        // Defer one tick so the CSS transition runs after first paint.
        wasm_bindgen_futures::spawn_local(async move {
            gloo_timers::future::TimeoutFuture::new(50).await;
            top_sheet.class_list().add_1(SHOW_CLASS).ok();
        });
    }
}

pub fn close_top_sheet(top_sheet_ref: NodeRef) {
    if let Some(top_sheet) = top_sheet_ref.cast::<web_sys::HtmlElement>() {
        top_sheet.class_list().remove_1(SHOW_CLASS).ok();
    }
}
