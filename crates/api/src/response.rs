//! API response types.

#![allow(missing_docs)]

use chrono::{DateTime, FixedOffset};
use serde::Serialize;
use tangle_db::entities::{
    comment, community,
    post::{self, PostCategory, PostType},
    report::{self, ReportStatus, ReportType},
    user::{self, UserRole},
};

/// Plain acknowledgement.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// User as shown to clients. Never includes the password hash.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub full_name: String,
    pub email: String,
    pub phone_number: String,
    pub role: UserRole,
    pub address: String,
    pub locality: String,
    pub pincode: String,
    pub is_active: bool,
    pub is_verified: bool,
    pub profile_picture: Option<String>,
    pub community_id: Option<String>,
    pub created_at: DateTime<FixedOffset>,
}

impl From<user::Model> for UserResponse {
    fn from(user: user::Model) -> Self {
        Self {
            id: user.id,
            full_name: user.full_name,
            email: user.email,
            phone_number: user.phone_number,
            role: user.role,
            address: user.address,
            locality: user.locality,
            pincode: user.pincode,
            is_active: user.is_active,
            is_verified: user.is_verified,
            profile_picture: user.profile_picture,
            community_id: user.community_id,
            created_at: user.created_at,
        }
    }
}

/// The short community block embedded in profiles.
#[derive(Debug, Serialize)]
pub struct CommunitySummary {
    pub id: String,
    pub name: String,
    pub location: String,
}

impl From<community::Model> for CommunitySummary {
    fn from(community: community::Model) -> Self {
        Self {
            id: community.id,
            name: community.name,
            location: community.location,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommunityResponse {
    pub id: String,
    pub name: String,
    pub community_code: String,
    pub location: String,
    pub city: String,
    pub state: String,
    pub pincode: String,
    pub is_active: bool,
    pub created_at: DateTime<FixedOffset>,
}

impl From<community::Model> for CommunityResponse {
    fn from(community: community::Model) -> Self {
        Self {
            id: community.id,
            name: community.name,
            community_code: community.community_code,
            location: community.location,
            city: community.city,
            state: community.state,
            pincode: community.pincode,
            is_active: community.is_active,
            created_at: community.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostResponse {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: PostCategory,
    #[serde(rename = "type")]
    pub post_type: PostType,
    pub contact_info: Option<String>,
    pub price: Option<f64>,
    pub location: Option<String>,
    pub images: Vec<String>,
    pub is_urgent: bool,
    pub is_featured: bool,
    pub view_count: i32,
    pub user_id: String,
    pub community_id: String,
    pub created_at: DateTime<FixedOffset>,
    pub updated_at: Option<DateTime<FixedOffset>>,
}

impl From<post::Model> for PostResponse {
    fn from(post: post::Model) -> Self {
        let images = post.image_list();
        Self {
            id: post.id,
            title: post.title,
            description: post.description,
            category: post.category,
            post_type: post.post_type,
            contact_info: post.contact_info,
            price: post.price,
            location: post.location,
            images,
            is_urgent: post.is_urgent,
            is_featured: post.is_featured,
            view_count: post.view_count,
            user_id: post.user_id,
            community_id: post.community_id,
            created_at: post.created_at,
            updated_at: post.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentResponse {
    pub id: String,
    pub content: String,
    pub user_id: String,
    pub post_id: String,
    pub created_at: DateTime<FixedOffset>,
    pub updated_at: DateTime<FixedOffset>,
}

impl From<comment::Model> for CommentResponse {
    fn from(comment: comment::Model) -> Self {
        Self {
            id: comment.id,
            content: comment.content,
            user_id: comment.user_id,
            post_id: comment.post_id,
            created_at: comment.created_at,
            updated_at: comment.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportResponse {
    pub id: String,
    pub reason: String,
    #[serde(rename = "type")]
    pub report_type: ReportType,
    pub status: ReportStatus,
    pub reporter_id: String,
    pub post_id: Option<String>,
    pub reported_user_id: Option<String>,
    pub admin_notes: Option<String>,
    pub created_at: DateTime<FixedOffset>,
    pub updated_at: DateTime<FixedOffset>,
}

impl From<report::Model> for ReportResponse {
    fn from(report: report::Model) -> Self {
        Self {
            id: report.id,
            reason: report.reason,
            report_type: report.report_type,
            status: report.status,
            reporter_id: report.reporter_id,
            post_id: report.post_id,
            reported_user_id: report.reported_user_id,
            admin_notes: report.admin_notes,
            created_at: report.created_at,
            updated_at: report.updated_at,
        }
    }
}

/// Map a list of models into their response type.
pub fn list<M, R: From<M>>(items: Vec<M>) -> Vec<R> {
    items.into_iter().map(R::from).collect()
}
