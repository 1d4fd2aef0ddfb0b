use crate::{
    error::{DesignError, Result},
    models::{DesignPrompts, DesignRequest, FormValue, GenerationPrompt, LayoutDescription, Slot},
};

// Form defaults, used when the caller leaves an optional field out.
pub const DEFAULT_FACING: &str = "North";
pub const DEFAULT_FLOORS: &str = "1";
pub const DEFAULT_BEDROOMS: &str = "2";
pub const DEFAULT_STYLE: &str = "Modern";
pub const DEFAULT_VASTU: &str = "Tamil Nadu";

/// Turns a design request into the three render prompts.
///
/// All three prompts start with the same layout paragraph, which is what keeps
/// the 2D plan, the 3D plan and the exterior describing one house. Field values
/// are interpolated as given; only the plot dimensions are checked. Optional
/// fields the caller leaves out take the form defaults above rather than
/// being rendered as a literal `undefined`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PromptComposer;

impl PromptComposer {
    pub fn new() -> Self {
        Self
    }

    pub fn compose(&self, request: &DesignRequest) -> Result<DesignPrompts> {
        let plot_length = required(&request.plot_length, "plotLength")?;
        let plot_width = required(&request.plot_width, "plotWidth")?;

        let layout = build_layout(
            &plot_length,
            &plot_width,
            &or_default(&request.facing, DEFAULT_FACING),
            &or_default(&request.bedrooms, DEFAULT_BEDROOMS),
            &or_default(&request.vastu, DEFAULT_VASTU),
        );

        let style = or_default(&request.style, DEFAULT_STYLE);
        let floors = or_default(&request.floors, DEFAULT_FLOORS);

        let floor_2d = prompt(
            Slot::Floor2D,
            &layout,
            "2D architectural floor plan.\n\
             TOP-DOWN blueprint.\n\
             Black and white.\n\
             Thin clean lines.\n\
             Labeled rooms.\n\
             NO 3D.",
        );
        let floor_3d = prompt(
            Slot::Floor3D,
            &layout,
            "3D isometric floor plan.\n\
             Dollhouse cutaway.\n\
             Same layout as 2D.\n\
             Modern Indian interior.\n\
             Architectural visualization.",
        );
        let exterior = prompt(
            Slot::Exterior,
            &layout,
            &format!(
                "Photorealistic {style} Indian house exterior.\n\
                 {floors} floors.\n\
                 Same window & door placement.\n\
                 Modern elevation.\n\
                 Daylight render."
            ),
        );

        Ok(DesignPrompts {
            layout,
            floor_2d,
            floor_3d,
            exterior,
        })
    }
}

fn required(value: &Option<FormValue>, field: &'static str) -> Result<String> {
    match value {
        Some(value) if !value.is_blank() => Ok(value.to_string()),
        _ => Err(DesignError::MissingRequiredField { field }),
    }
}

fn or_default(value: &Option<FormValue>, default: &str) -> String {
    value
        .as_ref()
        .map(FormValue::to_string)
        .unwrap_or_else(|| default.to_string())
}

fn build_layout(
    plot_length: &str,
    plot_width: &str,
    facing: &str,
    bedrooms: &str,
    vastu: &str,
) -> LayoutDescription {
    LayoutDescription::new(format!(
        "Rectangular Indian residential plot.\n\
         Plot size {plot_length}ft x {plot_width}ft.\n\
         Main entrance on {facing} side.\n\
         Living room near entrance.\n\
         Kitchen beside dining.\n\
         {bedrooms} bedrooms.\n\
         Bathroom near living.\n\
         Staircase in one corner.\n\
         {vastu} vastu compliant.\n\
         DO NOT change layout or proportions."
    ))
}

fn prompt(slot: Slot, layout: &LayoutDescription, directives: &str) -> GenerationPrompt {
    GenerationPrompt {
        slot,
        text: format!("{}\n{}", layout.as_str(), directives),
    }
}
