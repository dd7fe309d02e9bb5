use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::borrow::Cow;
use std::fmt;

/// Identifier a content type is registered under
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentTypeId(Cow<'static, str>);

impl ContentTypeId {
    pub const fn from_static(id: &'static str) -> Self {
        Self(Cow::Borrowed(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContentTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for ContentTypeId {
    fn from(id: &'static str) -> Self {
        Self::from_static(id)
    }
}

/// Which of the two descriptors a dialog opens with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DialogMethod {
    List,
    CreateEdit,
}

impl fmt::Display for DialogMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DialogMethod::List => f.write_str("list"),
            DialogMethod::CreateEdit => f.write_str("create-edit"),
        }
    }
}

/// Options applied to list content on mount
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ListOptions {
    pub multiple_select_enabled: bool,
    pub is_selection_list: bool,
    /// `true`: the content loads its own data and `models` is ignored
    pub load_data: bool,
    pub filter: Option<Map<String, Value>>,
    pub models: Option<Vec<Value>>,
    pub selected_elements: Vec<Value>,
}

impl ListOptions {
    /// Filter as handed to the content, `{}` when not configured
    pub fn effective_filter(&self) -> Map<String, Value> {
        self.filter.clone().unwrap_or_default()
    }

    /// Preloaded dataset, only when the content is not loading its own
    pub fn preloaded_models(&self) -> Option<&[Value]> {
        if self.load_data {
            None
        } else {
            self.models.as_deref()
        }
    }
}

/// Configuration payload carried by a descriptor
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContentConfig {
    pub model: Option<Value>,
    pub list: Option<ListOptions>,
}

/// A content type paired with its configuration. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentDescriptor {
    content_type: ContentTypeId,
    method: DialogMethod,
    #[serde(default)]
    config: ContentConfig,
}

impl ContentDescriptor {
    pub fn new(content_type: impl Into<ContentTypeId>, method: DialogMethod, config: ContentConfig) -> Self {
        Self {
            content_type: content_type.into(),
            method,
            config,
        }
    }

    pub fn list(content_type: impl Into<ContentTypeId>, options: ListOptions) -> Self {
        Self::new(
            content_type,
            DialogMethod::List,
            ContentConfig {
                model: None,
                list: Some(options),
            },
        )
    }

    pub fn create_edit(content_type: impl Into<ContentTypeId>, model: Option<Value>) -> Self {
        Self::new(
            content_type,
            DialogMethod::CreateEdit,
            ContentConfig { model, list: None },
        )
    }

    pub fn content_type(&self) -> &ContentTypeId {
        &self.content_type
    }

    pub fn method(&self) -> DialogMethod {
        self.method
    }

    pub fn config(&self) -> &ContentConfig {
        &self.config
    }

    pub fn is_list(&self) -> bool {
        self.method == DialogMethod::List
    }
}

/// One descriptor per dialog method
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct DescriptorSet {
    pub list: Option<ContentDescriptor>,
    pub create_edit: Option<ContentDescriptor>,
}

impl DescriptorSet {
    pub fn get(&self, method: DialogMethod) -> Option<&ContentDescriptor> {
        match method {
            DialogMethod::List => self.list.as_ref(),
            DialogMethod::CreateEdit => self.create_edit.as_ref(),
        }
    }
}
