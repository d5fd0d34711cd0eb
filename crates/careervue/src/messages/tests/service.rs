use std::collections::HashSet;
use std::sync::Arc;
use std::thread;

use super::common::*;

use crate::messages::domain::{
    AdminResponse, ContactMessage, MessageId, MessagePriority, MessageStatus,
};
use crate::messages::repository::RepositoryError;
use crate::messages::service::{
    MessageQuery, MessageService, MessageServiceError, MessageValidationError, ReplyRequest,
    SortField, SortOrder, StatusUpdate,
};
use crate::sentiment::{Sentiment, SentimentScorer};

fn competing_reply(message: &mut ContactMessage) {
    message.status = MessageStatus::Replied;
    message.admin_response = Some(AdminResponse {
        message: "Reindexed overnight.".to_string(),
        responded_by: Some("ops@careervue.test".to_string()),
        responded_at: at(2025, 10, 2, 8),
    });
}

#[test]
fn submit_stores_unread_medium_priority_message() {
    let repository = MemoryRepository::default();
    let service = service_with(repository.clone());

    let message = service
        .submit_at(positive_submission(), at(2025, 10, 1, 9))
        .expect("submission accepted");

    assert_eq!(message.status, MessageStatus::Unread);
    assert_eq!(message.priority, MessagePriority::Medium);
    assert!(message.is_active);
    assert!(message.id.0.starts_with("msg-"));
    assert_eq!(repository.stored(&message.id), Some(message));
}

#[test]
fn submit_rejects_missing_required_fields() {
    let service = service_with(MemoryRepository::default());
    let mut incomplete = positive_submission();
    incomplete.email = "   ".to_string();
    incomplete.message = String::new();

    let err = service.submit(incomplete).expect_err("validation fails");
    match err {
        MessageServiceError::Validation(MessageValidationError::MissingFields(fields)) => {
            assert_eq!(fields, vec!["email", "message"]);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn get_marks_unread_messages_as_read() {
    let repository = MemoryRepository::default();
    let service = service_with(repository.clone());
    let stored = service.submit(neutral_submission()).expect("stored");

    let fetched = service.get(&stored.id).expect("message found");
    assert_eq!(fetched.status, MessageStatus::Read);
    assert_eq!(
        repository.stored(&stored.id).map(|message| message.status),
        Some(MessageStatus::Read)
    );
}

#[test]
fn get_leaves_replied_messages_alone() {
    let service = service_with(MemoryRepository::default());
    let stored = service.submit(neutral_submission()).expect("stored");
    service
        .respond(
            &stored.id,
            ReplyRequest {
                response: "Use the attachments tab.".to_string(),
                responded_by: None,
            },
        )
        .expect("reply recorded");

    let fetched = service.get(&stored.id).expect("message found");
    assert_eq!(fetched.status, MessageStatus::Replied);
}

#[test]
fn detail_view_keeps_a_reply_written_while_it_was_in_flight() {
    let repository = MemoryRepository::default();
    let stored = service_with(repository.clone())
        .submit(negative_submission())
        .expect("stored");
    let service = MessageService::new(
        Arc::new(InterleavingRepository::new(repository.clone(), competing_reply)),
        Arc::new(SentimentScorer::default()),
    );

    let viewed = service.get(&stored.id).expect("message found");
    assert_eq!(viewed.status, MessageStatus::Replied);

    let persisted = repository.stored(&stored.id).expect("still stored");
    assert_eq!(persisted.status, MessageStatus::Replied);
    assert!(persisted.admin_response.is_some(), "admin reply was lost");
}

#[test]
fn triage_update_keeps_a_reply_written_while_it_was_in_flight() {
    let repository = MemoryRepository::default();
    let stored = service_with(repository.clone())
        .submit(negative_submission())
        .expect("stored");
    let service = MessageService::new(
        Arc::new(InterleavingRepository::new(repository.clone(), competing_reply)),
        Arc::new(SentimentScorer::default()),
    );

    service
        .update_status(
            &stored.id,
            StatusUpdate {
                status: None,
                priority: Some(MessagePriority::High),
            },
        )
        .expect("update applied");

    let persisted = repository.stored(&stored.id).expect("still stored");
    assert_eq!(persisted.priority, MessagePriority::High);
    assert_eq!(persisted.status, MessageStatus::Replied);
    assert!(persisted.admin_response.is_some(), "admin reply was lost");
}

#[test]
fn concurrent_views_and_replies_never_drop_a_reply() {
    let repository = MemoryRepository::default();
    let service = service_with(repository.clone());
    let ids: Vec<_> = (0..32)
        .map(|_| service.submit(neutral_submission()).expect("stored").id)
        .collect();

    thread::scope(|scope| {
        scope.spawn(|| {
            for id in &ids {
                service.get(id).expect("message found");
            }
        });
        scope.spawn(|| {
            for id in ids.iter().rev() {
                service
                    .respond(
                        id,
                        ReplyRequest {
                            response: "Use the attachments tab.".to_string(),
                            responded_by: None,
                        },
                    )
                    .expect("reply recorded");
            }
        });
    });

    for id in &ids {
        let persisted = repository.stored(id).expect("still stored");
        assert_eq!(persisted.status, MessageStatus::Replied);
        assert!(persisted.admin_response.is_some(), "admin reply was lost");
    }
}

#[test]
fn unknown_message_is_not_found() {
    let service = service_with(MemoryRepository::default());
    let err = service
        .get(&MessageId("msg-missing".to_string()))
        .expect_err("missing");
    assert!(matches!(
        err,
        MessageServiceError::Repository(RepositoryError::NotFound)
    ));
}

#[test]
fn update_status_changes_only_supplied_fields() {
    let service = service_with(MemoryRepository::default());
    let stored = service.submit(negative_submission()).expect("stored");

    let updated = service
        .update_status(
            &stored.id,
            StatusUpdate {
                status: None,
                priority: Some(MessagePriority::Urgent),
            },
        )
        .expect("update applied");

    assert_eq!(updated.priority, MessagePriority::Urgent);
    assert_eq!(updated.status, MessageStatus::Unread);
}

#[test]
fn respond_records_admin_reply() {
    let service = service_with(MemoryRepository::default());
    let stored = service.submit(negative_submission()).expect("stored");
    let responded_at = at(2025, 10, 2, 14);

    let replied = service
        .respond_at(
            &stored.id,
            ReplyRequest {
                response: "  We fixed the search index.  ".to_string(),
                responded_by: Some("support@careervue.test".to_string()),
            },
            responded_at,
        )
        .expect("reply recorded");

    assert_eq!(replied.status, MessageStatus::Replied);
    let response = replied.admin_response.expect("response stored");
    assert_eq!(response.message, "We fixed the search index.");
    assert_eq!(response.responded_at, responded_at);
}

#[test]
fn respond_requires_text() {
    let service = service_with(MemoryRepository::default());
    let stored = service.submit(negative_submission()).expect("stored");

    let err = service
        .respond(&stored.id, ReplyRequest::default())
        .expect_err("empty reply rejected");
    assert!(matches!(
        err,
        MessageServiceError::Validation(MessageValidationError::EmptyResponse)
    ));
}

#[test]
fn delete_removes_message() {
    let repository = MemoryRepository::default();
    let service = service_with(repository.clone());
    let stored = service.submit(neutral_submission()).expect("stored");

    service.delete(&stored.id).expect("deleted");
    assert!(repository.stored(&stored.id).is_none());
    assert!(service.delete(&stored.id).is_err());
}

#[test]
fn list_filters_sorts_pages_and_scores() {
    let service = service_with(MemoryRepository::default());
    service
        .submit_at(positive_submission(), at(2025, 10, 1, 9))
        .expect("stored");
    service
        .submit_at(negative_submission(), at(2025, 10, 2, 9))
        .expect("stored");
    service
        .submit_at(neutral_submission(), at(2025, 10, 3, 9))
        .expect("stored");

    let page = service.list(&MessageQuery::default()).expect("listed");
    assert_eq!(page.total, 3);
    assert_eq!(page.total_pages, 1);
    assert_eq!(page.current_page, 1);
    let names: Vec<_> = page
        .messages
        .iter()
        .map(|view| view.message.name.as_str())
        .collect();
    assert_eq!(names, vec!["Maya", "Lee", "Asha"]);
    assert_eq!(page.messages[0].sentiment, Sentiment::Neutral);
    assert_eq!(page.messages[1].sentiment, Sentiment::Negative);
    assert_eq!(page.messages[1].sentiment_score, -1.0);
    assert_eq!(page.messages[2].sentiment, Sentiment::Positive);

    let query = MessageQuery {
        page: Some(2),
        limit: Some(2),
        sort_by: SortField::Name,
        sort_order: SortOrder::Asc,
        ..MessageQuery::default()
    };
    let page = service.list(&query).expect("listed");
    assert_eq!(page.total_pages, 2);
    assert_eq!(page.messages.len(), 1);
    assert_eq!(page.messages[0].message.name, "Maya");

    let query = MessageQuery {
        search: Some("SEARCH".to_string()),
        ..MessageQuery::default()
    };
    let page = service.list(&query).expect("listed");
    assert_eq!(page.total, 1);
    assert_eq!(page.messages[0].message.name, "Lee");
}

#[test]
fn paging_through_equal_sort_keys_is_stable() {
    let service = service_with(MemoryRepository::default());
    for hour in 0..12 {
        service
            .submit_at(neutral_submission(), at(2025, 10, 1, hour))
            .expect("stored");
    }

    let mut seen = Vec::new();
    for page in 1..=3 {
        let query = MessageQuery {
            page: Some(page),
            limit: Some(5),
            sort_by: SortField::Priority,
            sort_order: SortOrder::Asc,
            ..MessageQuery::default()
        };
        let listed = service.list(&query).expect("listed");
        seen.extend(listed.messages.into_iter().map(|view| view.message));
    }

    assert_eq!(seen.len(), 12);
    let distinct: HashSet<_> = seen.iter().map(|message| message.id.clone()).collect();
    assert_eq!(distinct.len(), 12);
    assert!(seen
        .windows(2)
        .all(|pair| pair[0].created_at < pair[1].created_at));
}

#[test]
fn list_filters_by_status() {
    let service = service_with(MemoryRepository::default());
    let read = service.submit(positive_submission()).expect("stored");
    service.submit(negative_submission()).expect("stored");
    service.get(&read.id).expect("marked read");

    let query = MessageQuery {
        status: Some(MessageStatus::Unread),
        ..MessageQuery::default()
    };
    let page = service.list(&query).expect("listed");
    assert_eq!(page.total, 1);
    assert_eq!(page.messages[0].message.name, "Lee");
}

#[test]
fn overview_counts_today_and_read_rate() {
    let service = service_with(MemoryRepository::default());
    let now = at(2025, 10, 3, 18);
    let first = service
        .submit_at(positive_submission(), at(2025, 10, 1, 9))
        .expect("stored");
    service
        .submit_at(negative_submission(), at(2025, 10, 3, 8))
        .expect("stored");
    service
        .submit_at(neutral_submission(), at(2025, 10, 3, 10))
        .expect("stored");
    service
        .respond(
            &first.id,
            ReplyRequest {
                response: "Thanks!".to_string(),
                responded_by: None,
            },
        )
        .expect("replied");

    let overview = service.overview(now).expect("overview");
    assert_eq!(overview.total_messages, 3);
    assert_eq!(overview.unread_messages, 2);
    assert_eq!(overview.replied_messages, 1);
    assert_eq!(overview.today_messages, 2);
    assert_eq!(overview.read_rate, 33);
}

#[test]
fn overview_of_empty_inbox_is_zero() {
    let service = service_with(MemoryRepository::default());
    let overview = service.overview(at(2025, 10, 3, 18)).expect("overview");
    assert_eq!(overview.total_messages, 0);
    assert_eq!(overview.read_rate, 0);
}

#[test]
fn statistics_group_recent_messages_by_day_and_sentiment() {
    let service = service_with(MemoryRepository::default());
    let now = at(2025, 10, 31, 12);
    service
        .submit_at(positive_submission(), at(2025, 9, 1, 9))
        .expect("stored");
    service
        .submit_at(positive_submission(), at(2025, 10, 20, 9))
        .expect("stored");
    service
        .submit_at(negative_submission(), at(2025, 10, 20, 15))
        .expect("stored");
    service
        .submit_at(neutral_submission(), at(2025, 10, 30, 9))
        .expect("stored");

    let stats = service.statistics(now).expect("statistics");
    assert_eq!(stats.total_messages, 4);

    assert_eq!(stats.daily_messages.len(), 2);
    let first_day = &stats.daily_messages[0];
    assert_eq!(first_day.date.to_string(), "2025-10-20");
    assert_eq!(first_day.count, 2);
    assert_eq!(first_day.positive, 1);
    assert_eq!(first_day.negative, 1);
    assert_eq!(stats.daily_messages[1].neutral, 1);

    assert_eq!(stats.messages_by_status.len(), 1);
    assert_eq!(stats.messages_by_status[0].status, MessageStatus::Unread);
    assert_eq!(stats.messages_by_status[0].count, 4);
    assert_eq!(stats.messages_by_priority[0].priority, MessagePriority::Medium);

    let sentiment = &stats.sentiment_stats;
    assert_eq!(sentiment.total, 4);
    assert_eq!(sentiment.positive, 2);
    assert_eq!(sentiment.negative, 1);
    assert_eq!(sentiment.neutral, 1);
    assert!((sentiment.average_score - 0.25).abs() < f64::EPSILON);
    assert!((sentiment.positive_percentage - 50.0).abs() < f64::EPSILON);
}

#[test]
fn repository_outage_surfaces_as_error() {
    let service = crate::messages::service::MessageService::new(
        std::sync::Arc::new(UnavailableRepository),
        std::sync::Arc::new(crate::sentiment::SentimentScorer::default()),
    );
    let err = service.statistics(at(2025, 10, 1, 0)).expect_err("outage");
    assert!(matches!(
        err,
        MessageServiceError::Repository(RepositoryError::Unavailable(_))
    ));
}
