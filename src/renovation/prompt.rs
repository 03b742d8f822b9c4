//! Renovation instruction text sent to the image model.

use super::options::{InteriorStyle, TransformOptions, WallColor};

/// Elements that must stay exactly where they are.
const FIXED_ELEMENTS: &str = "doors, windows, walls, ceiling height, and overall layout";

/// Renders the instruction for `style` and `wall_color`.
///
/// Pure and deterministic: identical inputs give byte-identical output.
/// With [`WallColor::NoChange`] the text carries no paint instruction at all.
pub fn build_prompt(style: InteriorStyle, wall_color: &WallColor) -> String {
    let mut prompt = format!(
        "Transform this photo of an interior into a visualization of how it would look \
         after a full reconstruction in a {style} style. \
         Keep all main construction elements ({FIXED_ELEMENTS}) in the exact same place; \
         do not move, resize or change them. \
         Never replace the windows. Never remove staircases."
    );

    if let WallColor::Hex(hex) = wall_color {
        prompt.push_str(&format!(" Paint the walls in {hex} color."));
    }

    prompt.push_str(&format!(
        " Replace old, worn or damaged surfaces, including walls, floors and ceilings, \
         with clean, renovated materials in line with the {style} style. \
         Replace old furniture and ceiling lamps with furnishings and lighting fixtures \
         that match the {style} style. \
         Use realistic textures, natural lighting, and high-quality interior design details \
         to show a professional, photorealistic result. \
         Do not include any text or watermarks, do not add people, avoid clutter, \
         and do not distort the perspective."
    ));

    prompt
}

impl TransformOptions {
    /// Instruction text for these options.
    pub fn prompt(&self) -> String {
        build_prompt(self.style, &self.wall_color)
    }
}
