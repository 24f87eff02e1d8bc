// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use yare::parameterized;

#[parameterized(
    unavailable = { "unavailable", RpcCode::Unavailable },
    deadline = { "deadline_exceeded", RpcCode::DeadlineExceeded },
    upper = { "NOT_FOUND", RpcCode::NotFound },
    us_spelling = { "canceled", RpcCode::Cancelled },
    data_loss = { "data_loss", RpcCode::DataLoss },
)]
fn code_from_str(input: &str, expected: RpcCode) {
    assert_eq!(input.parse::<RpcCode>().unwrap(), expected);
}

#[test]
fn code_from_str_rejects_unknown() {
    let err = "bogus".parse::<RpcCode>().unwrap_err();
    assert!(err.to_string().contains("bogus"));
}

#[parameterized(
    invalid_argument = { RpcCode::InvalidArgument, true },
    not_found = { RpcCode::NotFound, true },
    already_exists = { RpcCode::AlreadyExists, true },
    unavailable = { RpcCode::Unavailable, false },
    internal = { RpcCode::Internal, false },
    permission = { RpcCode::PermissionDenied, false },
)]
fn permanent_codes(code: RpcCode, permanent: bool) {
    assert_eq!(code.is_permanent(), permanent);
}

#[test]
fn status_display_includes_code_and_message() {
    let status = RpcStatus::new(RpcCode::Internal, "disk full");
    assert_eq!(status.to_string(), "remote error (internal): disk full");
}

#[test]
fn code_serializes_snake_case() {
    let json = serde_json::to_string(&RpcCode::FailedPrecondition).unwrap();
    assert_eq!(json, "\"failed_precondition\"");
}
