use yew::prelude::*;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Tone {
    #[default]
    Error,
    Success,
}

#[derive(Properties, PartialEq)]
pub struct NoticeProps {
    #[prop_or_default]
    pub message: Option<String>,
    #[prop_or_default]
    pub tone: Tone,
    #[prop_or_default]
    pub on_dismiss: Option<Callback<MouseEvent>>,
}

/// Banner shown above a view when an action failed (or a login succeeded).
#[function_component(Notice)]
pub fn notice(props: &NoticeProps) -> Html {
    let Some(message) = props.message.as_ref() else {
        return Html::default();
    };
    let class = match props.tone {
        Tone::Error => "notice notice-error",
        Tone::Success => "notice notice-success",
    };

    html! {
        <div {class} role="alert">
            <span>{ message }</span>
            if let Some(on_dismiss) = props.on_dismiss.clone() {
                <button type="button" class="notice-close" onclick={on_dismiss}>{ "×" }</button>
            }
        </div>
    }
}

#[function_component(Loading)]
pub fn loading() -> Html {
    html! {
        <div class="loading">
            <div class="spinner"></div>
        </div>
    }
}
