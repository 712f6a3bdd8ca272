//! # Creative Snapshots
//!
//! Read-only snapshots of advertising creatives as delivered by the
//! creative source. A snapshot is fetched once per run, never mutated and
//! never persisted by this workspace.
//!
//! Wire names follow the platform: enum values are `SCREAMING_SNAKE_CASE`,
//! field names are `camelCase`.

use serde::{Deserialize, Serialize};

use crate::identity::{CreativeId, GroupId, PolicyTopic};

// ---------------------------------------------------------------------------
// Channel
// ---------------------------------------------------------------------------

/// The advertising surface a creative's campaign targets.
///
/// Exactly five channels are supported; the creative source pre-filters to
/// these, so there is deliberately no catch-all variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Channel {
    /// Search results.
    Search,
    /// Display network.
    Display,
    /// Video inventory.
    Video,
    /// Multi-channel (app and similar) campaigns.
    MultiChannel,
    /// Performance Max campaigns.
    PerformanceMax,
}

impl Channel {
    /// All supported channels, in wire order.
    pub fn all() -> &'static [Channel] {
        &[
            Self::Search,
            Self::Display,
            Self::Video,
            Self::MultiChannel,
            Self::PerformanceMax,
        ]
    }

    /// Whether creatives on this channel may be appealed automatically.
    pub fn allows_automatic_appeal(&self) -> bool {
        match self {
            Self::Search | Self::Display | Self::Video => true,
            Self::MultiChannel | Self::PerformanceMax => false,
        }
    }

    /// Whether every decision on this channel must be surfaced to a human.
    pub fn requires_manual_review(&self) -> bool {
        match self {
            Self::Search | Self::Display | Self::Video => false,
            Self::MultiChannel | Self::PerformanceMax => true,
        }
    }

    /// Return the wire value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Search => "SEARCH",
            Self::Display => "DISPLAY",
            Self::Video => "VIDEO",
            Self::MultiChannel => "MULTI_CHANNEL",
            Self::PerformanceMax => "PERFORMANCE_MAX",
        }
    }
}

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// CreativeType
// ---------------------------------------------------------------------------

/// Creative format as reported by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CreativeType {
    TextAd,
    ExpandedTextAd,
    ResponsiveSearchAd,
    ResponsiveDisplayAd,
    ImageAd,
    VideoAd,
    VideoResponsiveAd,
    AppAd,
    CallAd,
    DiscoveryMultiAssetAd,
    ShoppingProductAd,
    AssetGroup,
    /// Forward-compatible catch-all for formats the platform introduces
    /// after this version is deployed.
    #[serde(other)]
    Unknown,
}

impl CreativeType {
    /// Return the wire value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TextAd => "TEXT_AD",
            Self::ExpandedTextAd => "EXPANDED_TEXT_AD",
            Self::ResponsiveSearchAd => "RESPONSIVE_SEARCH_AD",
            Self::ResponsiveDisplayAd => "RESPONSIVE_DISPLAY_AD",
            Self::ImageAd => "IMAGE_AD",
            Self::VideoAd => "VIDEO_AD",
            Self::VideoResponsiveAd => "VIDEO_RESPONSIVE_AD",
            Self::AppAd => "APP_AD",
            Self::CallAd => "CALL_AD",
            Self::DiscoveryMultiAssetAd => "DISCOVERY_MULTI_ASSET_AD",
            Self::ShoppingProductAd => "SHOPPING_PRODUCT_AD",
            Self::AssetGroup => "ASSET_GROUP",
            Self::Unknown => "UNKNOWN",
        }
    }
}

impl std::fmt::Display for CreativeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ApprovalStatus
// ---------------------------------------------------------------------------

/// Overall policy approval status of a creative.
///
/// Carried into reports only; the classifier works from the per-topic flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApprovalStatus {
    Approved,
    ApprovedLimited,
    AreaOfInterestOnly,
    Disapproved,
    /// Forward-compatible catch-all.
    #[serde(other)]
    Unknown,
}

impl ApprovalStatus {
    /// Return the wire value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Approved => "APPROVED",
            Self::ApprovedLimited => "APPROVED_LIMITED",
            Self::AreaOfInterestOnly => "AREA_OF_INTEREST_ONLY",
            Self::Disapproved => "DISAPPROVED",
            Self::Unknown => "UNKNOWN",
        }
    }
}

impl std::fmt::Display for ApprovalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// PolicyTopicEntry
// ---------------------------------------------------------------------------

/// One policy violation or annotation attached to a creative.
///
/// `appealable` and `under_review` are independent: all four combinations
/// are legal inputs to the classifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyTopicEntry {
    /// The policy topic name.
    pub topic: PolicyTopic,
    /// Whether the platform accepts an appeal for this topic.
    pub appealable: bool,
    /// Whether the platform is already re-reviewing this topic.
    #[serde(default)]
    pub under_review: bool,
}

impl PolicyTopicEntry {
    /// Create a topic entry.
    pub fn new(topic: PolicyTopic, appealable: bool, under_review: bool) -> Self {
        Self {
            topic,
            appealable,
            under_review,
        }
    }
}

// ---------------------------------------------------------------------------
// Creative
// ---------------------------------------------------------------------------

/// One advertising unit under review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Creative {
    /// Creative identifier, unique within the account.
    pub id: CreativeId,
    /// Creative format.
    #[serde(rename = "type")]
    pub creative_type: CreativeType,
    /// Channel of the owning campaign.
    pub channel: Channel,
    /// Ad group the creative belongs to.
    pub group_id: GroupId,
    /// Display name of the owning campaign.
    #[serde(default)]
    pub campaign_name: String,
    /// Display name of the owning ad group.
    #[serde(default)]
    pub group_name: String,
    /// Overall approval status.
    pub approval_status: ApprovalStatus,
    /// Policy topics in platform order. May be empty.
    #[serde(default)]
    pub policy_topics: Vec<PolicyTopicEntry>,
}

impl Creative {
    /// Create a creative with no topics, empty names and `UNKNOWN` approval status.
    pub fn new(
        id: CreativeId,
        group_id: GroupId,
        channel: Channel,
        creative_type: CreativeType,
    ) -> Self {
        Self {
            id,
            creative_type,
            channel,
            group_id,
            campaign_name: String::new(),
            group_name: String::new(),
            approval_status: ApprovalStatus::Unknown,
            policy_topics: Vec::new(),
        }
    }

    /// Set campaign and group display names.
    pub fn with_names(mut self, campaign_name: impl Into<String>, group_name: impl Into<String>) -> Self {
        self.campaign_name = campaign_name.into();
        self.group_name = group_name.into();
        self
    }

    /// Set the approval status.
    pub fn with_approval_status(mut self, status: ApprovalStatus) -> Self {
        self.approval_status = status;
        self
    }

    /// Append a policy topic entry.
    pub fn with_topic(mut self, entry: PolicyTopicEntry) -> Self {
        self.policy_topics.push(entry);
        self
    }

    /// Whether the platform reported no policy topics for this creative.
    pub fn has_policy_data(&self) -> bool {
        !self.policy_topics.is_empty()
    }
}
