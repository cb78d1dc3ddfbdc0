//! Schema-driven object form
//!
//! Renders a [`SchemaObject`] as a tree of controls, one per key, in document
//! order. The form writes back into the same object in place and never adds
//! or removes keys.
//!
//! | value        | control                                            |
//! |--------------|----------------------------------------------------|
//! | bool         | checkbox; shift-click sets the range since the last toggle |
//! | number       | text input, coerced by [`coerce_number`]           |
//! | string       | single-select from the option list for that key    |
//! | object       | framed group titled with the capitalized key       |
//! | object array | collapsible sub-form per element ("Condition 2")   |

use std::collections::{HashMap, HashSet};

use egui::{Color32, RichText, Ui};

use crate::schema::labels::{capitalize, element_label, humanize_key, strip_known_prefixes};
use crate::schema::{coerce_number, select_bool_range, OptionCatalog, SchemaObject, SchemaValue};

/// Per-editor widget state that is not part of the document
#[derive(Debug, Default)]
pub struct FormState {
    /// Text being typed into numeric fields, keyed by field path
    number_text: HashMap<String, String>,
    /// Numeric fields whose text was rejected
    invalid: HashSet<String>,
    /// Last toggled boolean: (parent object path, field position)
    bool_anchor: Option<(String, usize)>,
}

impl FormState {
    /// Forget buffers after the document was replaced
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn has_invalid_fields(&self) -> bool {
        !self.invalid.is_empty()
    }

    pub fn is_invalid(&self, path: &str) -> bool {
        self.invalid.contains(path)
    }

    /// Apply the text typed into the numeric field at `path`.
    ///
    /// Accepted text updates `value`; rejected text leaves `value` alone and
    /// flags the field until it is corrected. Returns whether `value` changed.
    pub fn commit_number(&mut self, path: &str, text: &str, value: &mut f64) -> bool {
        match coerce_number(text) {
            Some(parsed) => {
                self.invalid.remove(path);
                if parsed.to_bits() != value.to_bits() {
                    *value = parsed;
                    return true;
                }
                false
            }
            None => {
                self.invalid.insert(path.to_string());
                false
            }
        }
    }

    /// Record a boolean toggle; returns the anchor for a range select if the
    /// previous toggle was in the same object and shift is held.
    pub fn toggle_bool(&mut self, parent: &str, index: usize, shift: bool) -> Option<usize> {
        let anchor = match &self.bool_anchor {
            Some((anchor_parent, anchor)) if shift && anchor_parent == parent => Some(*anchor),
            _ => None,
        };
        self.bool_anchor = Some((parent.to_string(), index));
        anchor
    }
}

fn field_path(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", parent, key)
    }
}

fn number_text(value: f64) -> String {
    value.to_string()
}

/// Render the whole document. Returns whether any value changed.
pub fn render_tree(
    ui: &mut Ui,
    state: &mut FormState,
    document: &mut SchemaObject,
    options: &OptionCatalog,
) -> bool {
    let mut changed = false;
    render_object(ui, state, document, "", options, &mut changed);
    changed
}

fn render_object(
    ui: &mut Ui,
    state: &mut FormState,
    object: &mut SchemaObject,
    path: &str,
    options: &OptionCatalog,
    changed: &mut bool,
) {
    let mut range: Option<(usize, usize)> = None;

    for (index, (key, value)) in object.fields_mut().iter_mut().enumerate() {
        let path_here = field_path(path, key);
        match value {
            SchemaValue::Bool(flag) => {
                let response = ui.checkbox(flag, humanize_key(key));
                if response.clicked() {
                    *changed = true;
                    let shift = ui.input(|i| i.modifiers.shift);
                    if let Some(anchor) = state.toggle_bool(path, index, shift) {
                        range = Some((anchor, index));
                    }
                }
            }
            SchemaValue::Number(number) => {
                ui.horizontal(|ui| {
                    ui.label(humanize_key(key));
                    let text = state
                        .number_text
                        .entry(path_here.clone())
                        .or_insert_with(|| number_text(*number));
                    let invalid = state.invalid.contains(&path_here);
                    let mut edit = egui::TextEdit::singleline(text).desired_width(120.0);
                    if invalid {
                        edit = edit.text_color(Color32::LIGHT_RED);
                    }
                    let response = ui.add(edit);
                    if response.changed() {
                        let text = text.clone();
                        *changed |= state.commit_number(&path_here, &text, number);
                    }
                    if state.invalid.contains(&path_here) {
                        ui.colored_label(Color32::LIGHT_RED, "not a number")
                            .on_hover_text(format!("Keeping {}", number));
                    }
                });
            }
            SchemaValue::EnumString(selected) => {
                ui.horizontal(|ui| {
                    ui.label(humanize_key(key));
                    egui::ComboBox::from_id_salt(&path_here)
                        .selected_text(strip_known_prefixes(selected))
                        .show_ui(ui, |ui| {
                            for option in options.options_for(key) {
                                let is_selected = selected == option;
                                if ui
                                    .selectable_label(is_selected, strip_known_prefixes(option))
                                    .clicked()
                                    && !is_selected
                                {
                                    *selected = option.clone();
                                    *changed = true;
                                }
                            }
                        });
                });
            }
            SchemaValue::Object(child) => {
                egui::Frame::group(ui.style()).show(ui, |ui| {
                    ui.label(RichText::new(capitalize(key)).strong());
                    render_object(ui, state, child, &path_here, options, changed);
                });
            }
            SchemaValue::ObjectArray(items) => {
                for (item_index, item) in items.iter_mut().enumerate() {
                    let item_path = format!("{}[{}]", path_here, item_index);
                    egui::CollapsingHeader::new(element_label(key, item_index))
                        .id_salt(&item_path)
                        .default_open(item_index == 0)
                        .show(ui, |ui| {
                            render_object(ui, state, item, &item_path, options, changed);
                        });
                }
            }
        }
    }

    if let Some((anchor, clicked)) = range {
        let count = select_bool_range(object, anchor, clicked);
        tracing::debug!("Range select at '{}' set {} fields", path, count);
    }
}
