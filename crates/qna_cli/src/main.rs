//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `qna_core` linkage.
//! - Run one ask/answer/delete cycle against the configured store.
//!
//! Environment:
//! - `QNA_DB_PATH`: database file; in-memory when unset.
//! - `QNA_LOG_DIR`: absolute log directory; file logging is off when unset.
//! - `QNA_LOG_LEVEL`: log level, defaults to the build-mode level.

use log::info;
use qna_core::db::{open_db, open_db_in_memory};
use qna_core::{
    QnaService, SqliteDeleteHistoryRepository, SqliteQuestionRepository, SqliteUnitOfWork,
    SqliteUserRepository, User, UserRepository,
};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    println!("qna_core ping={}", qna_core::ping());
    println!("qna_core version={}", qna_core::core_version());

    if let Ok(log_dir) = std::env::var("QNA_LOG_DIR") {
        let level = std::env::var("QNA_LOG_LEVEL")
            .unwrap_or_else(|_| qna_core::default_log_level().to_string());
        qna_core::init_logging(&level, &log_dir)?;
    }

    let conn = match std::env::var("QNA_DB_PATH") {
        Ok(path) => open_db(path)?,
        Err(_) => open_db_in_memory()?,
    };

    let users = SqliteUserRepository::try_new(&conn)?;
    let writer = match users.find_by_user_id("javajigi")? {
        Some(existing) => existing,
        None => {
            let created = User::new("javajigi", "password", "javajigi", "javajigi@slipp.net");
            users.save(&created)?;
            created
        }
    };

    let service = QnaService::new(
        SqliteQuestionRepository::try_new(&conn)?,
        SqliteDeleteHistoryRepository::try_new(&conn)?,
        SqliteUnitOfWork::try_new(&conn)?,
    );
    let question = service.ask(&writer, "smoke title", "smoke contents")?;
    service.add_answer(&writer, question.id(), "smoke answer")?;
    let histories = service.delete_question(&writer, question.id())?;

    info!(
        "event=cli_smoke module=cli status=ok question_id={} records={}",
        question.id(),
        histories.len()
    );
    println!(
        "qna_core smoke delete_records={} live_questions={}",
        histories.len(),
        service.list_questions()?.len()
    );
    Ok(())
}
