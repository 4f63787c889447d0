//! HTML tooltip rendering of [`AttributeSettings`].

use std::fmt::Write;

use crate::{
    attribute::{AttributeGraph, AttributeHandle},
    config::CodecConfig,
    settings::{AttributeSettings, Slot},
};

fn row(out: &mut String, label: &str, value: &str) {
    let _ = write!(out, "<tr><td><b>{label}: </b></td><td>{value}</td></tr>");
}

fn preview(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}

impl AttributeSettings {
    /// Render an HTML table describing this record.
    ///
    /// When `value` names a node of a graph, its hierarchical name is included. Value previews
    /// are cut to 100 characters.
    #[must_use]
    pub fn build_tooltip_string(&self, value: Option<(&AttributeGraph, AttributeHandle)>) -> String {
        self.build_tooltip_string_with(value, &CodecConfig::default())
    }

    /// Render an HTML table describing this record, with the preview length of `config`
    #[must_use]
    pub fn build_tooltip_string_with(
        &self,
        value: Option<(&AttributeGraph, AttributeHandle)>,
        config: &CodecConfig,
    ) -> String {
        let mut out = String::with_capacity(2048);
        out.push_str("<table border=\"0\">");
        let _ = write!(
            out,
            "<tr><td width=\"150\"><b>Name: </b></td><td width=\"300\">{}</td></tr>",
            self.name()
        );
        row(&mut out, "Internal Name", self.internal_name());

        if let Some((graph, handle)) = value {
            row(&mut out, "Hierarchical Name", &graph.build_hierarchical_name(handle));
        }

        if !self.description.is_empty() {
            row(&mut out, "Description", &self.description);
        }

        if let Some(default) = self.default_value() {
            row(&mut out, "Attribute Type", default.type_string());
        }

        for (slot, label) in [
            (Slot::Default, "Default Value"),
            (Slot::Min, "Minimum Value"),
            (Slot::Max, "Maximum Value"),
        ] {
            let Some(text) = self.value(slot).and_then(|v| v.convert_to_string().ok()) else {
                continue;
            };
            row(&mut out, label, preview(&text, config.tooltip_preview_len));
        }

        // Interface types are shown signed, so the default reads as -1
        row(
            &mut out,
            "Interface Type ID",
            &(self.interface_type as i32).to_string(),
        );
        row(
            &mut out,
            "References Other",
            if self.references_other_attribute() { "Yes" } else { "No" },
        );

        out.push_str("</table>");
        out
    }
}
