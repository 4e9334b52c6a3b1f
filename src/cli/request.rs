//! Request decoding and dispatch
//!
//! A request is a JSON object tagged by `op`:
//!
//! ```json
//! {"op": "borrow_book", "book_id": 1, "member_id": 2, "due_date": "2025-02-01"}
//! ```
//!
//! Dispatch always yields a response object; domain failures become
//! `{"status": "error", ...}` and never end the process.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::library::{
    BookUpdate, BorrowRequest, LibraryError, LibraryService, MemberUpdate, NewBook, NewMember,
};
use crate::observability::{log_event_with_fields, Event};

use super::errors::CliError;
use super::io::{error_response, ok_response};

/// Every operation the core exposes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Request {
    AddBook(NewBook),
    AddBooks { books: Vec<NewBook> },
    ListBooks,
    UpdateBook(BookUpdate),
    DeleteBook { book_id: i32 },
    AddMember(NewMember),
    AddMembers { members: Vec<NewMember> },
    ListMembers,
    UpdateMember(MemberUpdate),
    DeleteMember { member_id: i32 },
    BorrowBook(BorrowRequest),
    ReturnBook { borrow_id: i32 },
    ListLoans,
    SummaryReport,
}

impl Request {
    /// Operation name as it appears in `op`.
    pub fn op(&self) -> &'static str {
        match self {
            Request::AddBook(_) => "add_book",
            Request::AddBooks { .. } => "add_books",
            Request::ListBooks => "list_books",
            Request::UpdateBook(_) => "update_book",
            Request::DeleteBook { .. } => "delete_book",
            Request::AddMember(_) => "add_member",
            Request::AddMembers { .. } => "add_members",
            Request::ListMembers => "list_members",
            Request::UpdateMember(_) => "update_member",
            Request::DeleteMember { .. } => "delete_member",
            Request::BorrowBook(_) => "borrow_book",
            Request::ReturnBook { .. } => "return_book",
            Request::ListLoans => "list_loans",
            Request::SummaryReport => "summary_report",
        }
    }

    /// Runs the request against `service`.
    pub fn execute(self, service: &LibraryService) -> Result<Value, LibraryError> {
        match self {
            Request::AddBook(new) => to_value(service.add_book(new)?),
            Request::AddBooks { books } => to_value(service.add_books(books)?),
            Request::ListBooks => to_value(service.list_books()?),
            Request::UpdateBook(update) => to_value(service.update_book(update)?),
            Request::DeleteBook { book_id } => to_value(service.delete_book(book_id)?),
            Request::AddMember(new) => to_value(service.add_member(new)?),
            Request::AddMembers { members } => to_value(service.add_members(members)?),
            Request::ListMembers => to_value(service.list_members()?),
            Request::UpdateMember(update) => to_value(service.update_member(update)?),
            Request::DeleteMember { member_id } => to_value(service.delete_member(member_id)?),
            Request::BorrowBook(request) => to_value(service.borrow_book(request)?),
            Request::ReturnBook { borrow_id } => to_value(service.return_book(borrow_id)?),
            Request::ListLoans => to_value(service.list_loans()?),
            Request::SummaryReport => to_value(service.generate_summary_report()?),
        }
    }
}

fn to_value<T: Serialize>(value: T) -> Result<Value, LibraryError> {
    serde_json::to_value(value)
        .map_err(|e| LibraryError::InvalidInput(format!("Failed to encode response: {}", e)))
}

/// Parses and runs one raw request line, returning the response object.
///
/// `request_id` tags the log lines of this request.
pub fn handle_request(service: &LibraryService, raw: &str, request_id: &str) -> Value {
    let request: Request = match serde_json::from_str(raw) {
        Ok(request) => request,
        Err(e) => {
            let err = CliError::bad_request(format!("Invalid request: {}", e));
            log_event_with_fields(
                Event::RequestRejected,
                &[("code", err.code_str()), ("request_id", request_id)],
            );
            return error_response(err.code_str(), err.message());
        }
    };

    let op = request.op();
    log_event_with_fields(
        Event::RequestReceived,
        &[("op", op), ("request_id", request_id)],
    );

    match request.execute(service) {
        Ok(data) => {
            log_event_with_fields(
                Event::RequestCompleted,
                &[("op", op), ("request_id", request_id)],
            );
            ok_response(data)
        }
        Err(e) => {
            let message = e.to_string();
            log_event_with_fields(
                Event::RequestRejected,
                &[
                    ("code", e.code()),
                    ("message", &message),
                    ("op", op),
                    ("request_id", request_id),
                ],
            );
            error_response(e.code(), &message)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::{FixedClock, LibraryStores};
    use crate::storage::Layout;
    use serde_json::json;
    use tempfile::TempDir;

    fn service(dir: &TempDir) -> LibraryService {
        LibraryService::with_clock(
            LibraryStores::in_dir(dir.path(), Layout::Packed),
            Box::new(FixedClock::on(2025, 6, 1).unwrap()),
        )
    }

    fn run(svc: &LibraryService, request: Value) -> Value {
        handle_request(svc, &request.to_string(), "test")
    }

    #[test]
    fn test_parse_tagged_requests() {
        let req: Request = serde_json::from_str(r#"{"op": "list_loans"}"#).unwrap();
        assert_eq!(req, Request::ListLoans);

        let req: Request =
            serde_json::from_str(r#"{"op": "add_book", "book_id": 4, "title": "Dune"}"#).unwrap();
        match req {
            Request::AddBook(new) => {
                assert_eq!(new.book_id, 4);
                assert_eq!(new.copies, 1);
                assert_eq!(new.year, 0);
            }
            other => panic!("unexpected request: {:?}", other),
        }
    }

    #[test]
    fn test_round_trip_through_service() {
        let temp_dir = TempDir::new().unwrap();
        let svc = service(&temp_dir);

        let resp = run(&svc, json!({"op": "add_book", "book_id": 1, "title": "Dune", "copies": 1}));
        assert_eq!(resp["status"], "ok");
        assert_eq!(resp["data"]["status"], "Active");

        let resp = run(&svc, json!({"op": "add_member", "name": "Ann"}));
        assert_eq!(resp["data"]["member_id"], 1);

        let resp = run(&svc, json!({"op": "borrow_book", "book_id": 1, "member_id": 1, "due_date": "2025-06-15"}));
        assert_eq!(resp["data"]["borrow_id"], 1);
        assert_eq!(resp["data"]["loan_date"], "2025-06-01");

        let resp = run(&svc, json!({"op": "borrow_book", "book_id": 1, "member_id": 1}));
        assert_eq!(resp["status"], "error");
        assert_eq!(resp["code"], "BOOKVAULT_NO_COPIES_AVAILABLE");

        let resp = run(&svc, json!({"op": "summary_report"}));
        assert_eq!(resp["data"]["totals"]["borrowed"], 1);
        assert_eq!(resp["data"]["rows"][0]["borrowers"][0], "Ann");
    }

    #[test]
    fn test_bad_requests_become_error_responses() {
        let temp_dir = TempDir::new().unwrap();
        let svc = service(&temp_dir);

        let resp = handle_request(&svc, "not json", "r1");
        assert_eq!(resp["code"], "BOOKVAULT_CLI_BAD_REQUEST");

        let resp = run(&svc, json!({"op": "launch_rockets"}));
        assert_eq!(resp["code"], "BOOKVAULT_CLI_BAD_REQUEST");

        let resp = run(&svc, json!({"op": "return_book"}));
        assert_eq!(resp["code"], "BOOKVAULT_CLI_BAD_REQUEST");
    }

    #[test]
    fn test_every_op_name_parses_back() {
        let requests = [
            json!({"op": "add_books", "books": []}),
            json!({"op": "list_books"}),
            json!({"op": "update_book", "book_id": 1}),
            json!({"op": "delete_book", "book_id": 1}),
            json!({"op": "add_members", "members": []}),
            json!({"op": "list_members"}),
            json!({"op": "update_member", "member_id": 1}),
            json!({"op": "delete_member", "member_id": 1}),
            json!({"op": "return_book", "borrow_id": 1}),
        ];
        for raw in requests {
            let req: Request = serde_json::from_value(raw.clone()).unwrap();
            assert_eq!(req.op(), raw["op"]);
        }
    }
}
