use log::error;
use wasm_bindgen_futures::spawn_local;
use web_sys::{HtmlInputElement, HtmlSelectElement};
use yew::prelude::*;

use crate::api::ApiClient;
use crate::notice::{Loading, Notice};
use crate::resource::{
    deliver_if_alive, load_scoped, remove, submit, Draft, DraftValue, FieldKind, FieldSpec, Resource, ResourceAction,
    ResourceState, Submitted,
};
use crate::session::{use_session, Role};

#[derive(Properties, PartialEq)]
pub struct ResourcePageProps {
    pub audience: Role,
}

/* -------------------------------------------------------------------------- */
/*                                 formulaire                                 */
/* -------------------------------------------------------------------------- */

/// One labelled control bound to `draft[spec.name]`.
pub(crate) fn field_input(spec: &FieldSpec, draft: &Draft, oninput: &Callback<(&'static str, DraftValue)>) -> Html {
    let name = spec.name;
    let control = match spec.kind {
        FieldKind::Select(options) => {
            let onchange = oninput.reform(move |e: Event| {
                let select: HtmlSelectElement = e.target_unchecked_into();
                (name, DraftValue::Text(select.value()))
            });
            let current = draft.text(name).to_string();
            html! {
                <select {name} {onchange} required={spec.required}>
                    { for options.iter().map(|(value, label)| html! {
                        <option value={*value} selected={current == *value}>{ *label }</option>
                    }) }
                </select>
            }
        }
        FieldKind::Flag => {
            let onchange = oninput.reform(move |e: Event| {
                let select: HtmlSelectElement = e.target_unchecked_into();
                (name, DraftValue::Flag(select.value() == "true"))
            });
            let yes = draft.flag(name);
            html! {
                <select {name} {onchange}>
                    <option value="false" selected={!yes}>{ "No" }</option>
                    <option value="true" selected={yes}>{ "Yes" }</option>
                </select>
            }
        }
        kind => {
            let oninput = oninput.reform(move |e: InputEvent| {
                let input: HtmlInputElement = e.target_unchecked_into();
                (name, DraftValue::Text(input.value()))
            });
            html! {
                <input
                    type={kind.input_type()}
                    {name}
                    placeholder={spec.label}
                    value={draft.text(name).to_string()}
                    required={spec.required}
                    {oninput}
                />
            }
        }
    };

    html! {
        <label class="field">
            <span>{ spec.label }</span>
            { control }
        </label>
    }
}

fn record_row<R: Resource>(record: &R, editable: bool, on_edit: &Callback<R>, on_delete: &Callback<String>) -> Html {
    let edit = {
        let record = record.clone();
        on_edit.reform(move |_: MouseEvent| record.clone())
    };
    let delete = {
        let id = record.id().to_string();
        on_delete.reform(move |_: MouseEvent| id.clone())
    };

    html! {
        <li class="record">
            { record.summary() }
            <div class="record-actions">
                if editable {
                    <button type="button" class="btn-edit" onclick={edit}>{ "Edit" }</button>
                }
                <button type="button" class="btn-delete" onclick={delete}>{ "Delete" }</button>
            </div>
        </li>
    }
}

/* -------------------------------------------------------------------------- */
/*                             composant principal                            */
/* -------------------------------------------------------------------------- */

/// List + create/edit form + delete for any [`Resource`], rendered inside a
/// guarded layout.
#[function_component(ResourcePage)]
pub fn resource_page<R>(props: &ResourcePageProps) -> Html
where
    R: Resource,
{
    let audience = props.audience;
    let session = use_session();
    let client = use_memo((session, audience), |(session, audience)| {
        ApiClient::browser(session.clone(), *audience)
    });
    let state = use_reducer(move || ResourceState::<R>::for_audience(audience));
    let owner = use_state(|| None::<String>);
    // false once the page is gone; late answers are dropped
    let alive = use_mut_ref(|| true);

    /* ---------- chargement initial ---------- */
    {
        let client = (*client).clone();
        let state = state.clone();
        let owner = owner.clone();
        let alive = alive.clone();
        use_effect_with((), move |_| {
            *alive.borrow_mut() = true;
            let flag = alive.clone();
            spawn_local(async move {
                let result = load_scoped::<R, _>(&client).await;
                deliver_if_alive(&flag, R::PLURAL, result, |result| match result {
                    Ok(loaded) => {
                        owner.set(loaded.owner);
                        state.dispatch(ResourceAction::Loaded(loaded.records));
                    }
                    Err(e) => {
                        error!("load {}: {e}", R::PLURAL);
                        state.dispatch(ResourceAction::Failed(e.to_string()));
                    }
                });
            });
            move || *alive.borrow_mut() = false
        });
    }

    /* ---------- création / mise à jour ---------- */
    let onsubmit = {
        let client = (*client).clone();
        let state = state.clone();
        let owner = (*owner).clone();
        let alive = alive.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let client = client.clone();
            let state = state.clone();
            let owner = owner.clone();
            let alive = alive.clone();
            let draft = state.draft.clone();
            let editing = state.editing_id.clone();
            spawn_local(async move {
                let result = submit::<R, _>(&client, owner.as_deref(), &draft, editing.as_deref()).await;
                deliver_if_alive(&alive, R::SINGULAR, result, |result| match result {
                    Ok(Submitted::Created(record)) => state.dispatch(ResourceAction::Created(record)),
                    Ok(Submitted::Updated { id, record }) => state.dispatch(ResourceAction::Updated(id, record)),
                    Err(e) => {
                        error!("save {}: {e}", R::SINGULAR);
                        state.dispatch(ResourceAction::Failed(e.to_string()));
                    }
                });
            });
        })
    };

    /* ---------- suppression ---------- */
    let on_delete = {
        let client = (*client).clone();
        let state = state.clone();
        let alive = alive.clone();
        Callback::from(move |id: String| {
            let question = format!("Are you sure you want to delete this {}?", R::SINGULAR.to_lowercase());
            if !gloo_dialogs::confirm(&question) {
                return;
            }
            let client = client.clone();
            let state = state.clone();
            let alive = alive.clone();
            spawn_local(async move {
                let result = remove::<R, _>(&client, &id).await;
                deliver_if_alive(&alive, R::SINGULAR, result, |result| match result {
                    Ok(()) => state.dispatch(ResourceAction::Removed(id)),
                    Err(e) => {
                        error!("delete {} {id}: {e}", R::SINGULAR);
                        state.dispatch(ResourceAction::Failed(e.to_string()));
                    }
                });
            });
        })
    };

    let on_edit = {
        let state = state.clone();
        Callback::from(move |record: R| state.dispatch(ResourceAction::Edit(record)))
    };
    let on_cancel = {
        let state = state.clone();
        Callback::from(move |_: MouseEvent| state.dispatch(ResourceAction::CancelEdit))
    };
    let on_dismiss = {
        let state = state.clone();
        Callback::from(move |_: MouseEvent| state.dispatch(ResourceAction::Dismiss))
    };
    let on_input = {
        let state = state.clone();
        Callback::from(move |(name, value): (&'static str, DraftValue)| {
            state.dispatch(ResourceAction::Input(name.to_string(), value))
        })
    };

    if state.loading {
        return html! { <Loading /> };
    }

    let editable = R::editable_by(audience);
    let fields = R::fields(audience);
    let submit_label = if state.is_editing() {
        format!("Update {}", R::SINGULAR)
    } else {
        format!("Create {}", R::SINGULAR)
    };

    html! {
        <section class="resource-page">
            <h2>{ format!("Manage {}", R::PLURAL) }</h2>
            <Notice message={state.error.clone()} on_dismiss={on_dismiss} />

            if editable {
                <form class="resource-form" {onsubmit}>
                    { for fields.iter().map(|spec| field_input(spec, &state.draft, &on_input)) }
                    <div class="form-actions">
                        <button type="submit" class="btn-primary">{ submit_label }</button>
                        if state.is_editing() {
                            <button type="button" class="btn-secondary" onclick={on_cancel}>{ "Cancel" }</button>
                        }
                    </div>
                </form>
            }

            if state.records.is_empty() {
                <p class="empty">{ format!("No {} found.", R::PLURAL.to_lowercase()) }</p>
            } else {
                <ul class="record-list">
                    { for state.records.iter().map(|record| record_row(record, editable, &on_edit, &on_delete)) }
                </ul>
            }
        </section>
    }
}
