use super::ComponentType;

/// The data of a form submit.
///
/// [Discord docs](https://discord.com/developers/docs/interactions/receiving-and-responding#interaction-object-modal-submit-data-structure).
#[derive(Clone, Debug, Deserialize, Serialize)]
#[non_exhaustive]
pub struct ModalData {
    /// The custom id of the modal.
    pub custom_id: String,
    /// The submitted rows.
    #[serde(default)]
    pub components: Vec<ModalRow>,
}

impl ModalData {
    /// Iterates over every text input of the form.
    pub fn fields(&self) -> impl Iterator<Item = &ModalField> {
        self.components.iter().flat_map(|row| row.components.iter())
    }

    /// Returns the submitted value of the text input with the given custom id.
    ///
    /// An input the user left empty is reported as `None`.
    #[must_use]
    pub fn value_of(&self, custom_id: &str) -> Option<&str> {
        self.fields()
            .find(|field| field.custom_id == custom_id)
            .and_then(|field| field.value.as_deref())
            .filter(|value| !value.is_empty())
    }
}

/// An action row of a submitted form.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[non_exhaustive]
pub struct ModalRow {
    /// Always [`ComponentType::ActionRow`].
    #[serde(rename = "type")]
    pub kind: ComponentType,
    #[serde(default)]
    pub components: Vec<ModalField>,
}

/// A text input of a submitted form.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[non_exhaustive]
pub struct ModalField {
    #[serde(rename = "type")]
    pub kind: ComponentType,
    pub custom_id: String,
    #[serde(default)]
    pub value: Option<String>,
}
