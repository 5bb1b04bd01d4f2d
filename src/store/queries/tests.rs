use super::*;
use crate::store::Database;
use crate::store::models::SuggestionStatus;
use tempfile::TempDir;

async fn create_test_database() -> Result<(TempDir, Database)> {
    let temp_dir = TempDir::new()?;
    let database = Database::initialize_at(&temp_dir.path().join("test.db")).await?;
    Ok((temp_dir, database))
}

fn sample_entry() -> NewKnowledgeEntry {
    NewKnowledgeEntry {
        query_text: "the weather involves atmospheric pressure".to_string(),
        response_text: "Atmospheric pressure drives the weather.".to_string(),
        tags: vec!["weather".to_string(), "science".to_string()],
    }
}

#[tokio::test]
async fn create_and_get_knowledge_entry() -> Result<()> {
    let (_temp_dir, database) = create_test_database().await?;

    let entry = KnowledgeQueries::create(database.pool(), sample_entry()).await?;
    assert!(entry.id >= 1);
    assert_eq!(entry.query_text, "the weather involves atmospheric pressure");
    assert_eq!(entry.tags, vec!["weather", "science"]);

    let fetched = KnowledgeQueries::get_by_id(database.pool(), entry.id)
        .await?
        .expect("entry should exist");
    assert_eq!(fetched, entry);

    Ok(())
}

#[tokio::test]
async fn list_returns_entries_in_id_order() -> Result<()> {
    let (_temp_dir, database) = create_test_database().await?;

    for i in 0..3 {
        let new_entry = NewKnowledgeEntry {
            query_text: format!("question {}", i),
            response_text: format!("answer {}", i),
            tags: Vec::new(),
        };
        KnowledgeQueries::create(database.pool(), new_entry).await?;
    }

    let entries = KnowledgeQueries::list_all(database.pool()).await?;
    assert_eq!(entries.len(), 3);
    assert!(entries.windows(2).all(|pair| pair[0].id < pair[1].id));
    assert_eq!(KnowledgeQueries::count(database.pool()).await?, 3);

    Ok(())
}

#[tokio::test]
async fn delete_reports_whether_row_existed() -> Result<()> {
    let (_temp_dir, database) = create_test_database().await?;

    let entry = KnowledgeQueries::create(database.pool(), sample_entry()).await?;

    assert!(KnowledgeQueries::delete(database.pool(), entry.id).await?);
    assert!(!KnowledgeQueries::delete(database.pool(), entry.id).await?);
    assert!(
        KnowledgeQueries::get_by_id(database.pool(), entry.id)
            .await?
            .is_none()
    );

    Ok(())
}

#[tokio::test]
async fn empty_tags_round_trip() -> Result<()> {
    let (_temp_dir, database) = create_test_database().await?;

    let new_entry = NewKnowledgeEntry {
        query_text: "untagged question".to_string(),
        response_text: "untagged answer".to_string(),
        tags: Vec::new(),
    };

    let entry = KnowledgeQueries::create(database.pool(), new_entry).await?;
    assert!(entry.tags.is_empty());

    Ok(())
}

#[tokio::test]
async fn recorded_suggestions_are_pending_and_ordered() -> Result<()> {
    let (_temp_dir, database) = create_test_database().await?;

    let first = SuggestionQueries::record(database.pool(), "tell me about rockets").await?;
    let second = SuggestionQueries::record(database.pool(), "tell me about rockets").await?;

    assert_eq!(first.status, SuggestionStatus::Pending);
    assert_eq!(first.query_text, "tell me about rockets");
    // Repeated identical queries are recorded independently so operators can
    // see how often something was asked.
    assert!(second.id > first.id);

    let suggestions = SuggestionQueries::list_all(database.pool()).await?;
    assert_eq!(suggestions.len(), 2);
    assert_eq!(suggestions[0].id, first.id);
    assert_eq!(suggestions[1].id, second.id);

    Ok(())
}

#[tokio::test]
async fn delete_and_clear_suggestions() -> Result<()> {
    let (_temp_dir, database) = create_test_database().await?;

    let first = SuggestionQueries::record(database.pool(), "first question").await?;
    SuggestionQueries::record(database.pool(), "second question").await?;
    SuggestionQueries::record(database.pool(), "third question").await?;

    assert!(SuggestionQueries::delete(database.pool(), first.id).await?);
    assert!(!SuggestionQueries::delete(database.pool(), first.id).await?);

    let removed = SuggestionQueries::clear(database.pool()).await?;
    assert_eq!(removed, 2);
    assert!(SuggestionQueries::list_all(database.pool()).await?.is_empty());

    Ok(())
}
