//! Generic CRUD plumbing shared by the users, cars, reservations and bills
//! views: form drafts, list state and the four network operations.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use log::debug;
use serde::de::DeserializeOwned;
use serde_json::{Map, Number, Value};
use yew::prelude::*;

use crate::api::{ApiClient, ApiError, Method, Service, Transport};
use crate::models::{decode_item, decode_list};
use crate::resources::users::fetch_profile;
use crate::session::Role;

/* -------------------------------------------------------------------------- */
/*                              champs de formulaire                          */
/* -------------------------------------------------------------------------- */

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FieldKind {
    Text,
    Email,
    Password,
    Number,
    Date,
    /// `(value, label)` pairs.
    Select(&'static [(&'static str, &'static str)]),
    /// Yes/No select, sent as a JSON boolean.
    Flag,
    /// Comma separated input, sent as an array of strings.
    List,
}

impl FieldKind {
    pub fn input_type(self) -> &'static str {
        match self {
            FieldKind::Email => "email",
            FieldKind::Password => "password",
            FieldKind::Number => "number",
            FieldKind::Date => "date",
            _ => "text",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub default: &'static str,
}

impl FieldSpec {
    pub const fn new(name: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self { name, label, kind, required: true, default: "" }
    }

    pub const fn optional(self) -> Self {
        Self { required: false, ..self }
    }

    pub const fn with_default(self, default: &'static str) -> Self {
        Self { default, ..self }
    }
}

/* -------------------------------------------------------------------------- */
/*                                  brouillon                                 */
/* -------------------------------------------------------------------------- */

#[derive(Clone, Debug, PartialEq)]
pub enum DraftValue {
    Text(String),
    Flag(bool),
}

/// Editable copy of one record, keyed by field name.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Draft {
    values: BTreeMap<String, DraftValue>,
}

impl Draft {
    pub fn defaults(fields: &[FieldSpec]) -> Self {
        fields.iter().fold(Self::default(), |draft, spec| match spec.kind {
            FieldKind::Flag => draft.with_flag(spec.name, spec.default == "true"),
            _ => draft.with_text(spec.name, spec.default),
        })
    }

    pub fn with_text(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set(name, DraftValue::Text(value.into()));
        self
    }

    pub fn with_flag(mut self, name: &str, value: bool) -> Self {
        self.set(name, DraftValue::Flag(value));
        self
    }

    pub fn set(&mut self, name: &str, value: DraftValue) {
        self.values.insert(name.to_string(), value);
    }

    pub fn text(&self, name: &str) -> &str {
        match self.values.get(name) {
            Some(DraftValue::Text(text)) => text,
            _ => "",
        }
    }

    pub fn flag(&self, name: &str) -> bool {
        matches!(self.values.get(name), Some(DraftValue::Flag(true)))
    }

    /// `other` wins on every field it defines.
    pub fn merged(mut self, other: Draft) -> Self {
        self.values.extend(other.values);
        self
    }

    /// JSON object with one member per field of `fields`.
    pub fn to_json(&self, fields: &[FieldSpec]) -> Value {
        let mut body = Map::new();
        for spec in fields {
            let value = match spec.kind {
                FieldKind::Flag => Value::Bool(self.flag(spec.name)),
                FieldKind::Number => number_or_text(self.text(spec.name)),
                FieldKind::List => Value::Array(
                    self.text(spec.name)
                        .split(',')
                        .map(str::trim)
                        .filter(|item| !item.is_empty())
                        .map(|item| Value::String(item.to_string()))
                        .collect(),
                ),
                _ => Value::String(self.text(spec.name).to_string()),
            };
            body.insert(spec.name.to_string(), value);
        }
        Value::Object(body)
    }
}

fn number_or_text(raw: &str) -> Value {
    let trimmed = raw.trim();
    if let Ok(int) = trimmed.parse::<i64>() {
        return Value::Number(int.into());
    }
    trimmed
        .parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map(Value::Number)
        .unwrap_or_else(|| Value::String(raw.to_string()))
}

/* -------------------------------------------------------------------------- */
/*                             description ressource                          */
/* -------------------------------------------------------------------------- */

pub trait Resource: Clone + PartialEq + DeserializeOwned + 'static {
    const SINGULAR: &'static str;
    const PLURAL: &'static str;
    const SERVICE: Service;
    /// Member name when the list comes wrapped, e.g. `{ "bills": [...] }`.
    const LIST_KEY: &'static str;
    /// Member name when a single record comes wrapped.
    const ITEM_KEY: &'static str;

    fn id(&self) -> &str;
    fn created_at(&self) -> Option<&str>;

    /// Form fields shown to `audience`.
    fn fields(audience: Role) -> Vec<FieldSpec>;
    fn to_draft(&self) -> Draft;
    fn summary(&self) -> Html;

    fn list_path(owner: Option<&str>) -> String;
    fn create_path() -> String;
    fn item_path(id: &str) -> String;

    /// When true the view resolves the caller's client id from the profile,
    /// scopes the list with it and stamps it on every submitted draft.
    fn owned_by(_audience: Role) -> bool {
        false
    }

    /// When false the view only lists and deletes.
    fn editable_by(_audience: Role) -> bool {
        true
    }
}

/* -------------------------------------------------------------------------- */
/*                                 état de vue                                */
/* -------------------------------------------------------------------------- */

#[derive(Clone, Debug, PartialEq)]
pub struct ResourceState<R> {
    pub records: Vec<R>,
    pub draft: Draft,
    pub editing_id: Option<String>,
    pub loading: bool,
    pub error: Option<String>,
    defaults: Draft,
}

pub enum ResourceAction<R> {
    Loaded(Vec<R>),
    Failed(String),
    Dismiss,
    Edit(R),
    CancelEdit,
    Input(String, DraftValue),
    Created(R),
    /// Answer to the PUT on the record with this id.
    Updated(String, R),
    Removed(String),
}

impl<R: Resource> ResourceState<R> {
    pub fn new(defaults: Draft) -> Self {
        Self {
            records: Vec::new(),
            draft: defaults.clone(),
            editing_id: None,
            loading: true,
            error: None,
            defaults,
        }
    }

    pub fn for_audience(audience: Role) -> Self {
        Self::new(Draft::defaults(&R::fields(audience)))
    }

    pub fn is_editing(&self) -> bool {
        self.editing_id.is_some()
    }

    pub fn apply(&mut self, action: ResourceAction<R>) {
        match action {
            ResourceAction::Loaded(records) => {
                self.records = records;
                self.loading = false;
                self.error = None;
            }
            ResourceAction::Failed(message) => {
                self.loading = false;
                self.error = Some(message);
            }
            ResourceAction::Dismiss => self.error = None,
            ResourceAction::Edit(record) => {
                self.editing_id = Some(record.id().to_string());
                self.draft = self.defaults.clone().merged(record.to_draft());
            }
            ResourceAction::CancelEdit => self.reset_form(),
            ResourceAction::Input(name, value) => self.draft.set(&name, value),
            // an edit opened while the request was in flight stays open
            ResourceAction::Created(record) => {
                self.records.push(record);
                if self.is_editing() {
                    self.error = None;
                } else {
                    self.reset_form();
                }
            }
            ResourceAction::Updated(id, record) => {
                if let Some(slot) = self.records.iter_mut().find(|r| r.id() == id) {
                    *slot = record;
                }
                if self.editing_id.as_deref() == Some(id.as_str()) {
                    self.reset_form();
                } else {
                    self.error = None;
                }
            }
            ResourceAction::Removed(id) => {
                self.records.retain(|r| r.id() != id);
                if self.editing_id.as_deref() == Some(id.as_str()) {
                    self.reset_form();
                }
            }
        }
    }

    fn reset_form(&mut self) {
        self.editing_id = None;
        self.draft = self.defaults.clone();
        self.error = None;
    }
}

impl<R: Resource> Reducible for ResourceState<R> {
    type Action = ResourceAction<R>;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut next = (*self).clone();
        next.apply(action);
        Rc::new(next)
    }
}

/* -------------------------------------------------------------------------- */
/*                              opérations réseau                             */
/* -------------------------------------------------------------------------- */

#[derive(Debug)]
pub struct Loaded<R> {
    pub owner: Option<String>,
    pub records: Vec<R>,
}

#[derive(Debug, PartialEq)]
pub enum Submitted<R> {
    Created(R),
    Updated { id: String, record: R },
}

pub async fn load<R: Resource, T: Transport>(client: &ApiClient<T>, owner: Option<&str>) -> Result<Vec<R>, ApiError> {
    let value = client
        .authed(Method::GET, R::SERVICE, &R::list_path(owner), None)
        .await?;
    decode_list(value, R::LIST_KEY)
}

/// Load sequence of a view: profile first when the records are owned by the
/// caller, then the collection.
pub async fn load_scoped<R: Resource, T: Transport>(client: &ApiClient<T>) -> Result<Loaded<R>, ApiError> {
    let owner = if R::owned_by(client.role()) {
        let profile = fetch_profile(client).await?;
        if profile.id.trim().is_empty() {
            return Err(ApiError::Decode("profile answered without an id".into()));
        }
        Some(profile.id)
    } else {
        None
    };
    let records = load::<R, T>(client, owner.as_deref()).await?;
    Ok(Loaded { owner, records })
}

pub fn request_body<R: Resource>(draft: &Draft, audience: Role, owner: Option<&str>) -> Value {
    let mut body = draft.to_json(&R::fields(audience));
    if let (Some(owner), Value::Object(map)) = (owner, &mut body) {
        map.insert("clientId".to_string(), Value::String(owner.to_string()));
    }
    body
}

/// POST when `editing_id` is absent, PUT on the item otherwise.
pub async fn submit<R: Resource, T: Transport>(
    client: &ApiClient<T>,
    owner: Option<&str>,
    draft: &Draft,
    editing_id: Option<&str>,
) -> Result<Submitted<R>, ApiError> {
    let body = request_body::<R>(draft, client.role(), owner);
    match editing_id {
        None => {
            let value = client
                .authed(Method::POST, R::SERVICE, &R::create_path(), Some(&body))
                .await?;
            Ok(Submitted::Created(decode_item(value, R::ITEM_KEY)?))
        }
        Some(id) => {
            let value = client
                .authed(Method::PUT, R::SERVICE, &R::item_path(id), Some(&body))
                .await?;
            let record = decode_item(value, R::ITEM_KEY)?;
            Ok(Submitted::Updated { id: id.to_string(), record })
        }
    }
}

pub async fn remove<R: Resource, T: Transport>(client: &ApiClient<T>, id: &str) -> Result<(), ApiError> {
    client.fetch_empty(R::SERVICE, &R::item_path(id)).await
}

/* -------------------------------------------------------------------------- */
/*                              réponses tardives                             */
/* -------------------------------------------------------------------------- */

/// Hands `value` to `deliver` unless the view behind `alive` is gone.
/// Returns whether it was delivered.
pub fn deliver_if_alive<V>(alive: &RefCell<bool>, what: &str, value: V, deliver: impl FnOnce(V)) -> bool {
    if !*alive.borrow() {
        debug!("view closed, dropping {what}");
        return false;
    }
    deliver(value);
    true
}
