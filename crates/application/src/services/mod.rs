pub mod delivery_service;
pub mod engagement_service;


pub use delivery_service::{
    CampaignDelivery, CampaignDeliveryDependencies, DeliveryReport, DeliverySettings,
    RecipientOutcome, SessionState,
};
pub use engagement_service::{EngagementService, EngagementServiceDependencies};
