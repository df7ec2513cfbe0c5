//! Topic form state: the fields, layout icons, language and length selects.
//!
//! [`TopicForm`] is the explicit UI state the controller mutates in response to
//! page events. It owns no I/O; every method is a pure state transition that
//! either succeeds or returns a [`FormError`] with the text to alert.
//!
//! # Invariants
//!
//! - There is always at least one topic field, and field ids are `1..=count`.
//! - Only the last field carries the add control; it also carries the remove
//!   control when more than one field exists.
//! - Exactly one layout icon is selected.
//! - In advanced mode the form holds a single field.

use crate::error::FormError;
use crate::models::{GenerateRequest, LengthMode};
use itertools::Itertools;
use tracing::debug;

/// One topic input on the form.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TopicField {
    /// Text as typed, untrimmed.
    pub value: String,
}

/// Affix controls rendered next to a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FieldControls {
    /// The "+" control; only on the last field.
    pub add: bool,
    /// The "-" control; only on the last field, and only when there are several.
    pub remove: bool,
}

/// A clickable layout icon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutIcon {
    pub layout: String,
    pub selected: bool,
}

/// The whole form as the reader sees it.
///
/// Created once at page load with [`TopicForm::new`] and then only changed
/// through its methods, which keep the invariants listed in the module docs.
#[derive(Debug, Clone)]
pub struct TopicForm {
    fields: Vec<TopicField>,
    controls: Vec<FieldControls>,
    layouts: Vec<LayoutIcon>,
    languages: Vec<String>,
    language: String,
    length: LengthMode,
    length_warning_visible: bool,
}

impl TopicForm {
    /// Build the form as it looks right after page load: one empty field,
    /// `default_layout` selected, standard length.
    ///
    /// # Arguments
    ///
    /// * `layouts` - Layout icons in display order; repeated ids are shown once
    /// * `default_layout` - Icon selected initially
    /// * `languages` - Options of the language select
    /// * `language` - Language selected initially
    ///
    /// # Returns
    ///
    /// A form with exactly one selected icon and a language taken from
    /// `languages`. An unlisted `default_layout` or `language` falls back to
    /// the first listed entry.
    pub fn new(layouts: &[String], default_layout: &str, languages: &[String], language: &str) -> Self {
        let layouts: Vec<&String> = layouts.iter().unique().collect();
        let selected = if layouts.iter().any(|l| *l == default_layout) {
            default_layout
        } else {
            layouts.first().map(|l| l.as_str()).unwrap_or(default_layout)
        };
        let mut icons: Vec<LayoutIcon> = layouts
            .iter()
            .map(|l| LayoutIcon { layout: (*l).clone(), selected: *l == selected })
            .collect();
        if icons.is_empty() {
            icons.push(LayoutIcon { layout: selected.to_string(), selected: true });
        }

        let languages: Vec<String> = languages.iter().unique().cloned().collect();
        let language = languages
            .iter()
            .find(|l| *l == language)
            .or(languages.first())
            .cloned()
            .unwrap_or_else(|| language.to_string());

        let mut form = Self {
            fields: vec![TopicField::default()],
            controls: Vec::new(),
            layouts: icons,
            languages,
            language,
            length: LengthMode::Standard,
            length_warning_visible: false,
        };
        form.refresh_controls();
        form
    }

    /// Number of topic fields currently rendered.
    pub fn topic_count(&self) -> usize {
        self.fields.len()
    }

    pub fn fields(&self) -> &[TopicField] {
        &self.fields
    }

    /// Controls per field, index-aligned with [`TopicForm::fields`].
    pub fn controls(&self) -> &[FieldControls] {
        &self.controls
    }

    pub fn layouts(&self) -> &[LayoutIcon] {
        &self.layouts
    }

    /// Identifier of the selected layout icon.
    pub fn selected_layout(&self) -> &str {
        self.layouts
            .iter()
            .find(|icon| icon.selected)
            .map(|icon| icon.layout.as_str())
            .unwrap_or_default()
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn length(&self) -> LengthMode {
        self.length
    }

    pub fn length_warning_visible(&self) -> bool {
        self.length_warning_visible
    }

    /// Append an empty field and return its id.
    pub fn add_field(&mut self) -> Result<usize, FormError> {
        if let Some(limit) = self.length.topic_limit() {
            if self.fields.len() >= limit {
                return Err(FormError::AddRefusedInAdvanced);
            }
        }
        self.fields.push(TopicField::default());
        self.refresh_controls();
        debug!(count = self.topic_count(), "Added topic field");
        Ok(self.fields.len())
    }

    /// Remove field `id`. Later fields shift down so ids stay contiguous.
    pub fn remove_field(&mut self, id: usize) -> Result<(), FormError> {
        if id == 1 {
            return Err(FormError::FirstFieldNotRemovable);
        }
        let index = self.index_of(id)?;
        self.fields.remove(index);
        self.refresh_controls();
        debug!(id, count = self.topic_count(), "Removed topic field");
        Ok(())
    }

    /// Record the text typed into field `id`.
    pub fn set_topic(&mut self, id: usize, text: &str) -> Result<(), FormError> {
        let index = self.index_of(id)?;
        if let Some(field) = self.fields.get_mut(index) {
            field.value = text.to_string();
        }
        Ok(())
    }

    /// Mark `layout` as the only selected icon.
    pub fn pick_layout(&mut self, layout: &str) -> Result<(), FormError> {
        if !self.layouts.iter().any(|icon| icon.layout == layout) {
            return Err(FormError::UnknownLayout { layout: layout.to_string() });
        }
        for icon in &mut self.layouts {
            icon.selected = icon.layout == layout;
        }
        Ok(())
    }

    pub fn set_language(&mut self, language: &str) -> Result<(), FormError> {
        if !self.languages.iter().any(|l| l == language) {
            return Err(FormError::UnknownLanguage { language: language.to_string() });
        }
        self.language = language.to_string();
        Ok(())
    }

    /// Apply a change of the length select. Returns how many fields were dropped.
    pub fn set_length(&mut self, mode: LengthMode) -> usize {
        self.length = mode;
        match mode.topic_limit() {
            Some(limit) => {
                self.length_warning_visible = true;
                let keep = limit.max(1);
                let dropped = self.fields.len().saturating_sub(keep);
                self.fields.truncate(keep);
                self.refresh_controls();
                dropped
            }
            None => {
                self.length_warning_visible = false;
                0
            }
        }
    }

    /// Trimmed, non-empty topics in field order.
    pub fn collect_topics(&self) -> Vec<String> {
        self.fields
            .iter()
            .map(|f| f.value.trim())
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect_vec()
    }

    /// Validate the form and build the request payload.
    pub fn build_request(&self) -> Result<GenerateRequest, FormError> {
        let topics = self.collect_topics();
        if topics.is_empty() {
            return Err(FormError::NoTopics);
        }
        if let Some(limit) = self.length.topic_limit() {
            if topics.len() > limit {
                return Err(FormError::TooManyTopicsForAdvanced { count: topics.len() });
            }
        }
        Ok(GenerateRequest {
            topics,
            layout: self.selected_layout().to_string(),
            language: self.language.clone(),
            length: self.length,
        })
    }

    fn index_of(&self, id: usize) -> Result<usize, FormError> {
        match id.checked_sub(1) {
            Some(index) if index < self.fields.len() => Ok(index),
            _ => Err(FormError::UnknownField { id }),
        }
    }

    fn refresh_controls(&mut self) {
        let count = self.fields.len();
        self.controls = (1..=count)
            .map(|id| FieldControls {
                add: id == count,
                remove: id == count && count > 1,
            })
            .collect();
    }

    #[cfg(test)]
    pub(crate) fn push_raw(&mut self, value: &str) {
        self.fields.push(TopicField { value: value.to_string() });
        self.refresh_controls();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DEFAULT_LANGUAGE, DEFAULT_LAYOUT};
    use proptest::prelude::*;

    fn form() -> TopicForm {
        let layouts = vec![
            "layout_1.html".to_string(),
            "layout_2.html".to_string(),
            "layout_3.html".to_string(),
        ];
        let languages = vec!["english".to_string(), "spanish".to_string()];
        TopicForm::new(&layouts, DEFAULT_LAYOUT, &languages, DEFAULT_LANGUAGE)
    }

    fn assert_controls_consistent(form: &TopicForm) {
        assert_eq!(form.controls().len(), form.topic_count());
        let with_add: Vec<usize> = form
            .controls()
            .iter()
            .enumerate()
            .filter(|(_, c)| c.add)
            .map(|(i, _)| i + 1)
            .collect();
        assert_eq!(with_add, vec![form.topic_count()]);
        let removable = form.controls().iter().filter(|c| c.remove).count();
        assert_eq!(removable, usize::from(form.topic_count() > 1));
    }

    #[test]
    fn test_initial_state() {
        let form = form();
        assert_eq!(form.topic_count(), 1);
        assert_eq!(form.selected_layout(), "layout_1.html");
        assert_eq!(form.language(), "english");
        assert_eq!(form.length(), LengthMode::Standard);
        assert!(!form.length_warning_visible());
        assert_eq!(form.controls(), &[FieldControls { add: true, remove: false }]);
    }

    #[test]
    fn test_add_and_remove_fields() {
        let mut form = form();
        assert_eq!(form.add_field(), Ok(2));
        assert_eq!(form.add_field(), Ok(3));
        assert_controls_consistent(&form);

        form.set_topic(2, "middle").unwrap();
        form.set_topic(3, "last").unwrap();
        form.remove_field(2).unwrap();
        assert_eq!(form.topic_count(), 2);
        assert_eq!(form.fields()[1].value, "last");
        assert_controls_consistent(&form);
    }

    #[test]
    fn test_first_field_is_never_removable() {
        let mut form = form();
        form.add_field().unwrap();
        assert_eq!(form.remove_field(1), Err(FormError::FirstFieldNotRemovable));
        assert_eq!(form.topic_count(), 2);
        assert_eq!(form.remove_field(7), Err(FormError::UnknownField { id: 7 }));
        assert_eq!(form.remove_field(0), Err(FormError::UnknownField { id: 0 }));
    }

    #[test]
    fn test_switching_to_advanced_collapses_fields() {
        let mut form = form();
        for _ in 0..4 {
            form.add_field().unwrap();
        }
        form.set_topic(1, "kept").unwrap();
        assert_eq!(form.set_length(LengthMode::Advanced), 4);
        assert_eq!(form.topic_count(), 1);
        assert_eq!(form.fields()[0].value, "kept");
        assert!(form.length_warning_visible());
        assert_controls_consistent(&form);

        assert_eq!(form.add_field(), Err(FormError::AddRefusedInAdvanced));
        assert_eq!(form.topic_count(), 1);

        assert_eq!(form.set_length(LengthMode::Standard), 0);
        assert!(!form.length_warning_visible());
        assert_eq!(form.add_field(), Ok(2));
    }

    #[test]
    fn test_pick_layout_keeps_single_selection() {
        let mut form = form();
        form.pick_layout("layout_3.html").unwrap();
        assert_eq!(form.selected_layout(), "layout_3.html");
        assert_eq!(form.layouts().iter().filter(|i| i.selected).count(), 1);

        let err = form.pick_layout("layout_9.html").unwrap_err();
        assert_eq!(err, FormError::UnknownLayout { layout: "layout_9.html".into() });
        assert_eq!(form.selected_layout(), "layout_3.html");
    }

    #[test]
    fn test_unknown_default_layout_falls_back_to_first_icon() {
        let layouts = vec!["a.html".to_string(), "b.html".to_string()];
        let form = TopicForm::new(&layouts, "missing.html", &["english".to_string()], "english");
        assert_eq!(form.selected_layout(), "a.html");
    }

    #[test]
    fn test_repeated_layouts_keep_single_selection() {
        let layouts = vec!["a.html".to_string(), "a.html".to_string(), "b.html".to_string()];
        let mut form = TopicForm::new(&layouts, "a.html", &["dutch".to_string()], "english");
        assert_eq!(form.layouts().len(), 2);
        assert_eq!(form.layouts().iter().filter(|i| i.selected).count(), 1);
        assert_eq!(form.language(), "dutch");

        form.set_topic(1, "dykes").unwrap();
        let req = form.build_request().unwrap();
        assert_eq!(req.language, "dutch");
        assert_eq!(req.layout, "a.html");
    }

    #[test]
    fn test_language_must_be_listed() {
        let mut form = form();
        form.set_language("spanish").unwrap();
        assert_eq!(form.language(), "spanish");
        assert!(form.set_language("klingon").is_err());
        assert_eq!(form.language(), "spanish");
    }

    #[test]
    fn test_build_request_trims_and_skips_blank_topics() {
        let mut form = form();
        form.add_field().unwrap();
        form.add_field().unwrap();
        form.set_topic(1, "  climate ").unwrap();
        form.set_topic(2, "   ").unwrap();
        form.set_topic(3, "markets").unwrap();
        form.pick_layout("layout_2.html").unwrap();

        let req = form.build_request().unwrap();
        assert_eq!(req.topics, vec!["climate", "markets"]);
        assert_eq!(req.layout, "layout_2.html");
        assert_eq!(req.language, "english");
        assert_eq!(req.length, LengthMode::Standard);
    }

    #[test]
    fn test_build_request_rejects_blank_form() {
        let mut form = form();
        form.add_field().unwrap();
        form.set_topic(1, " \t").unwrap();
        assert_eq!(form.build_request(), Err(FormError::NoTopics));
    }

    #[test]
    fn test_build_request_rejects_many_topics_in_advanced() {
        let mut form = form();
        form.set_length(LengthMode::Advanced);
        form.set_topic(1, "one").unwrap();
        form.push_raw("two");
        assert_eq!(
            form.build_request(),
            Err(FormError::TooManyTopicsForAdvanced { count: 2 })
        );
    }

    proptest! {
        /// Any add/remove sequence keeps the counter and the affix controls in sync.
        #[test]
        fn prop_add_remove_keeps_controls_in_sync(
            ops in proptest::collection::vec((any::<bool>(), 0usize..8), 0..60),
        ) {
            let mut form = form();
            let mut expected = 1usize;
            for (add, id) in ops {
                if add {
                    prop_assert_eq!(form.add_field(), Ok(expected + 1));
                    expected += 1;
                } else if id >= 2 && id <= expected {
                    prop_assert!(form.remove_field(id).is_ok());
                    expected -= 1;
                } else {
                    prop_assert!(form.remove_field(id).is_err());
                }
                prop_assert_eq!(form.topic_count(), expected);
                prop_assert_eq!(form.controls().len(), expected);
                prop_assert!(form.controls().last().map(|c| c.add).unwrap_or(false));
                prop_assert_eq!(form.controls().iter().filter(|c| c.add).count(), 1);
            }
        }

        /// Switching to advanced always leaves exactly one field.
        #[test]
        fn prop_advanced_leaves_one_field(extra in 0usize..20) {
            let mut form = form();
            for _ in 0..extra {
                form.add_field().unwrap();
            }
            form.set_length(LengthMode::Advanced);
            prop_assert_eq!(form.topic_count(), 1);
        }
    }
}
