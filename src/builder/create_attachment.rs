/// A file sent along with an interaction response.
///
/// The [`InteractionHttp`] implementation decides how the bytes are uploaded; the builder only
/// carries them.
///
/// [`InteractionHttp`]: crate::http::InteractionHttp
#[derive(Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
#[must_use]
pub struct CreateAttachment {
    pub data: Vec<u8>,
    pub filename: String,
    pub description: Option<String>,
}

impl CreateAttachment {
    /// Builds an [`CreateAttachment`] from the raw attachment data.
    pub fn bytes(data: impl Into<Vec<u8>>, filename: impl Into<String>) -> CreateAttachment {
        CreateAttachment {
            data: data.into(),
            filename: filename.into(),
            description: None,
        }
    }

    /// Sets a description for the file (max 1024 characters).
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}
