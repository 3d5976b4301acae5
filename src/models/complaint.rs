use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::utils::AppError;

/// Review status of a complaint. Any status may move to any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComplaintStatus {
    Pending,
    Approved,
    Rejected,
}

impl ComplaintStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComplaintStatus::Pending => "pending",
            ComplaintStatus::Approved => "approved",
            ComplaintStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for ComplaintStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComplaintStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ComplaintStatus::Pending),
            "approved" => Ok(ComplaintStatus::Approved),
            "rejected" => Ok(ComplaintStatus::Rejected),
            "" => Err(AppError::Validation("status cannot be empty".to_string())),
            _ => Err(AppError::Validation("invalid status value".to_string())),
        }
    }
}

/// Admin remark attached to a complaint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    pub admin_id: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl Comment {
    pub fn new(admin_id: &str, content: String) -> Self {
        Comment {
            id: uuid::Uuid::new_v4().to_string(),
            admin_id: admin_id.to_string(),
            content,
            created_at: Utc::now(),
        }
    }
}

/// Complaint document, stored in the `complaints` collection.
/// `user_id` is the owning student and never changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Complaint {
    pub id: String,
    pub user_id: String,
    pub description: String,
    pub status: ComplaintStatus,
    #[serde(default)]
    pub comments: Vec<Comment>,
    /// User IDs, each at most once.
    #[serde(default)]
    pub likes: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl Complaint {
    /// New complaints always start out pending.
    pub fn new(user_id: &str, description: String) -> Self {
        Complaint {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            description,
            status: ComplaintStatus::Pending,
            comments: Vec::new(),
            likes: Vec::new(),
            created_at: Utc::now(),
        }
    }

    pub fn is_liked_by(&self, user_id: &str) -> bool {
        self.likes.iter().any(|liked_by| liked_by == user_id)
    }

    /// Adds the like if absent. Returns whether anything changed.
    pub fn add_like(&mut self, user_id: &str) -> bool {
        if self.is_liked_by(user_id) {
            return false;
        }
        self.likes.push(user_id.to_string());
        true
    }

    /// Removes the like if present. Returns whether anything changed.
    pub fn remove_like(&mut self, user_id: &str) -> bool {
        let before = self.likes.len();
        self.likes.retain(|liked_by| liked_by != user_id);
        before != self.likes.len()
    }

    pub fn to_response(&self, viewer_id: &str) -> ComplaintResponse {
        ComplaintResponse {
            id: self.id.clone(),
            user_id: self.user_id.clone(),
            description: self.description.clone(),
            status: self.status,
            comments: self.comments.clone(),
            like_count: self.likes.len(),
            is_liked: self.is_liked_by(viewer_id),
            created_at: self.created_at,
        }
    }
}

/// Complaint as seen by a particular caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplaintResponse {
    pub id: String,
    pub user_id: String,
    pub description: String,
    pub status: ComplaintStatus,
    pub comments: Vec<Comment>,
    pub like_count: usize,
    pub is_liked: bool,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_complaint_is_pending() {
        let complaint = Complaint::new("user-1", "desk broken".into());
        assert_eq!(complaint.status, ComplaintStatus::Pending);
        assert!(complaint.comments.is_empty());
        assert!(complaint.likes.is_empty());
    }

    #[test]
    fn test_status_parsing() {
        assert_eq!("approved".parse::<ComplaintStatus>().unwrap(), ComplaintStatus::Approved);
        assert!(matches!("".parse::<ComplaintStatus>(), Err(AppError::Validation(_))));
        assert!(matches!("closed".parse::<ComplaintStatus>(), Err(AppError::Validation(_))));
        assert!("Approved".parse::<ComplaintStatus>().is_err());
    }

    #[test]
    fn test_likes_are_a_set() {
        let mut complaint = Complaint::new("owner", "noisy hallway".into());
        assert!(complaint.add_like("u1"));
        assert!(!complaint.add_like("u1"));
        assert!(complaint.add_like("u2"));
        assert_eq!(complaint.likes.len(), 2);

        assert!(complaint.remove_like("u1"));
        assert!(!complaint.remove_like("u1"));
        assert_eq!(complaint.likes, vec!["u2".to_string()]);
    }

    #[test]
    fn test_response_is_relative_to_viewer() {
        let mut complaint = Complaint::new("owner", "cold showers".into());
        complaint.add_like("viewer");

        let mine = complaint.to_response("viewer");
        assert!(mine.is_liked);
        assert_eq!(mine.like_count, 1);

        let theirs = complaint.to_response("someone-else");
        assert!(!theirs.is_liked);

        let json = serde_json::to_value(&mine).unwrap();
        assert_eq!(json["userId"], "owner");
        assert_eq!(json["status"], "pending");
        assert_eq!(json["likeCount"], 1);
        assert!(json.get("likes").is_none());
    }
}
