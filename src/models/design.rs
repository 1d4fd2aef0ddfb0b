use super::image::ImagePayload;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A scalar form value. The form posts a mix of strings and numbers, and
/// every value ends up interpolated into prompt text unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FormValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Flag(bool),
}

impl FormValue {
    /// Blank values count as missing: empty text, zero, NaN and `false`.
    pub fn is_blank(&self) -> bool {
        match self {
            FormValue::Text(s) => s.is_empty(),
            FormValue::Integer(n) => *n == 0,
            FormValue::Float(f) => *f == 0.0 || f.is_nan(),
            FormValue::Flag(b) => !b,
        }
    }
}

impl fmt::Display for FormValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormValue::Text(s) => f.write_str(s),
            FormValue::Integer(n) => write!(f, "{}", n),
            FormValue::Float(x) => write!(f, "{}", x),
            FormValue::Flag(b) => write!(f, "{}", b),
        }
    }
}

impl From<&str> for FormValue {
    fn from(value: &str) -> Self {
        FormValue::Text(value.to_string())
    }
}

impl From<String> for FormValue {
    fn from(value: String) -> Self {
        FormValue::Text(value)
    }
}

impl From<i64> for FormValue {
    fn from(value: i64) -> Self {
        FormValue::Integer(value)
    }
}

impl From<f64> for FormValue {
    fn from(value: f64) -> Self {
        FormValue::Float(value)
    }
}

/// House-design parameters as posted by the form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignRequest {
    pub plot_length: Option<FormValue>,
    pub plot_width: Option<FormValue>,
    pub facing: Option<FormValue>,
    pub floors: Option<FormValue>,
    pub bedrooms: Option<FormValue>,
    pub style: Option<FormValue>,
    pub vastu: Option<FormValue>,
}

impl DesignRequest {
    pub fn new(plot_length: impl Into<FormValue>, plot_width: impl Into<FormValue>) -> Self {
        Self {
            plot_length: Some(plot_length.into()),
            plot_width: Some(plot_width.into()),
            ..Default::default()
        }
    }

    pub fn with_facing(mut self, facing: impl Into<FormValue>) -> Self {
        self.facing = Some(facing.into());
        self
    }

    pub fn with_floors(mut self, floors: impl Into<FormValue>) -> Self {
        self.floors = Some(floors.into());
        self
    }

    pub fn with_bedrooms(mut self, bedrooms: impl Into<FormValue>) -> Self {
        self.bedrooms = Some(bedrooms.into());
        self
    }

    pub fn with_style(mut self, style: impl Into<FormValue>) -> Self {
        self.style = Some(style.into());
        self
    }

    pub fn with_vastu(mut self, vastu: impl Into<FormValue>) -> Self {
        self.vastu = Some(vastu.into());
        self
    }
}

/// One of the three named result positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    Floor2D,
    Floor3D,
    Exterior,
}

impl Slot {
    /// Generation order.
    pub const ALL: [Slot; 3] = [Slot::Floor2D, Slot::Floor3D, Slot::Exterior];

    pub fn key(&self) -> &'static str {
        match self {
            Slot::Floor2D => "floor2D",
            Slot::Floor3D => "floor3D",
            Slot::Exterior => "exterior",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Slot::Floor2D => "2D PLAN",
            Slot::Floor3D => "3D PLAN",
            Slot::Exterior => "EXTERIOR",
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The layout paragraph shared verbatim by all three prompts of a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutDescription(String);

impl LayoutDescription {
    pub(crate) fn new(text: String) -> Self {
        Self(text)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LayoutDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationPrompt {
    pub slot: Slot,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesignPrompts {
    pub layout: LayoutDescription,
    pub floor_2d: GenerationPrompt,
    pub floor_3d: GenerationPrompt,
    pub exterior: GenerationPrompt,
}

impl DesignPrompts {
    pub fn get(&self, slot: Slot) -> &GenerationPrompt {
        match slot {
            Slot::Floor2D => &self.floor_2d,
            Slot::Floor3D => &self.floor_3d,
            Slot::Exterior => &self.exterior,
        }
    }

    /// Prompts in generation order.
    pub fn iter(&self) -> impl Iterator<Item = &GenerationPrompt> {
        Slot::ALL.into_iter().map(move |slot| self.get(slot))
    }
}

/// Outcome of a single external call, before it is folded into a slot.
#[derive(Debug, Clone, PartialEq)]
pub enum SlotOutcome {
    Success(ImagePayload),
    Failure(String),
}

impl SlotOutcome {
    pub fn into_image(self) -> Option<ImagePayload> {
        match self {
            SlotOutcome::Success(image) => Some(image),
            SlotOutcome::Failure(_) => None,
        }
    }
}

/// Aggregate result: one optional image per slot.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GenerationResult {
    #[serde(rename = "floor2D")]
    pub floor_2d: Option<ImagePayload>,
    #[serde(rename = "floor3D")]
    pub floor_3d: Option<ImagePayload>,
    pub exterior: Option<ImagePayload>,
}

impl GenerationResult {
    pub fn get(&self, slot: Slot) -> Option<&ImagePayload> {
        match slot {
            Slot::Floor2D => self.floor_2d.as_ref(),
            Slot::Floor3D => self.floor_3d.as_ref(),
            Slot::Exterior => self.exterior.as_ref(),
        }
    }

    pub fn set(&mut self, slot: Slot, image: Option<ImagePayload>) {
        match slot {
            Slot::Floor2D => self.floor_2d = image,
            Slot::Floor3D => self.floor_3d = image,
            Slot::Exterior => self.exterior = image,
        }
    }

    pub fn populated(&self) -> usize {
        Slot::ALL
            .iter()
            .filter(|slot| self.get(**slot).is_some())
            .count()
    }
}
