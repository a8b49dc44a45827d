use bitflags::bitflags;

bitflags! {
    /// What has happened so far to the response of one interaction.
    ///
    /// The flags are owned by an [`InteractionHandle`] and only ever changed through an
    /// [`InteractionResponseContext`]. At most one of [`DEFERRING`] and [`RESPONDING`] is set at
    /// any time. [`DEFERRED`] and [`RESPONDED`] are terminal; the only transition clearing one of
    /// them is a deferred interaction receiving its real response, which replaces [`DEFERRED`]
    /// with [`RESPONDED`].
    ///
    /// [`InteractionHandle`]: crate::interaction::InteractionHandle
    /// [`InteractionResponseContext`]: crate::interaction::InteractionResponseContext
    /// [`DEFERRING`]: Self::DEFERRING
    /// [`RESPONDING`]: Self::RESPONDING
    /// [`DEFERRED`]: Self::DEFERRED
    /// [`RESPONDED`]: Self::RESPONDED
    #[derive(Copy, Clone, Default, Debug, Eq, Hash, PartialEq)]
    pub struct ResponseFlags: u8 {
        /// An acknowledgement without content is in flight.
        const DEFERRING = 1 << 0;
        /// The acknowledgement completed; a real response is still owed.
        const DEFERRED = 1 << 1;
        /// The first real response is in flight.
        const RESPONDING = 1 << 2;
        /// The first real response completed.
        const RESPONDED = 1 << 3;
        /// The visible response is only shown to the invoking user.
        const EPHEMERAL = 1 << 4;

        const ACKNOWLEDGING = Self::DEFERRING.bits() | Self::RESPONDING.bits();
        const ACKNOWLEDGED = Self::DEFERRED.bits() | Self::RESPONDED.bits();
        const DEFERRING_OR_DEFERRED = Self::DEFERRING.bits() | Self::DEFERRED.bits();
        const RESPONDING_OR_RESPONDED = Self::RESPONDING.bits() | Self::RESPONDED.bits();
        const ACKNOWLEDGING_OR_ACKNOWLEDGED =
            Self::ACKNOWLEDGING.bits() | Self::ACKNOWLEDGED.bits();
    }
}

impl ResponseFlags {
    /// Whether nothing was sent to, or is in flight for, the interaction yet.
    #[must_use]
    pub const fn is_unanswered(self) -> bool {
        !self.intersects(Self::ACKNOWLEDGING_OR_ACKNOWLEDGED)
    }

    /// Whether a deferral completed and the real response is still owed.
    #[must_use]
    pub const fn is_deferred(self) -> bool {
        self.contains(Self::DEFERRED)
    }

    /// Whether the first real response completed.
    #[must_use]
    pub const fn is_responded(self) -> bool {
        self.contains(Self::RESPONDED)
    }

    /// Whether the interaction was answered in any way.
    #[must_use]
    pub const fn is_acknowledged(self) -> bool {
        self.intersects(Self::ACKNOWLEDGED)
    }

    #[must_use]
    pub const fn is_ephemeral(self) -> bool {
        self.contains(Self::EPHEMERAL)
    }
}

#[cfg(test)]
mod tests {
    use super::ResponseFlags;

    #[test]
    fn unions() {
        assert_eq!(ResponseFlags::ACKNOWLEDGING.bits(), 0b0101);
        assert_eq!(ResponseFlags::ACKNOWLEDGED.bits(), 0b1010);
        assert_eq!(ResponseFlags::ACKNOWLEDGING_OR_ACKNOWLEDGED.bits(), 0b1111);
        assert!(ResponseFlags::DEFERRING_OR_DEFERRED.contains(ResponseFlags::DEFERRED));
        assert!(!ResponseFlags::RESPONDING_OR_RESPONDED.intersects(ResponseFlags::DEFERRING));
    }

    #[test]
    fn state_queries() {
        assert!(ResponseFlags::empty().is_unanswered());
        assert!(ResponseFlags::EPHEMERAL.is_unanswered());
        assert!(!ResponseFlags::DEFERRING.is_unanswered());

        let deferred = ResponseFlags::DEFERRED | ResponseFlags::EPHEMERAL;
        assert!(deferred.is_deferred());
        assert!(deferred.is_acknowledged());
        assert!(deferred.is_ephemeral());
        assert!(!deferred.is_responded());
    }
}
