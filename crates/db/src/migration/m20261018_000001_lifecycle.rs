//! Lifecycle schema: accounts, deposits and withdrawals.
//!
//! Uniqueness of reference numbers and per-user idempotency keys, the
//! non-negative balance and the amount bounds are all enforced here as
//! well as in application code.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: ACCOUNTS
        // ============================================================
        db.execute_unprepared(ACCOUNTS_SQL).await?;

        // ============================================================
        // PART 2: REQUESTS
        // ============================================================
        db.execute_unprepared(DEPOSITS_SQL).await?;
        db.execute_unprepared(WITHDRAWALS_SQL).await?;

        // ============================================================
        // PART 3: REVIEW QUEUE INDEXES
        // ============================================================
        db.execute_unprepared(INDEXES_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

// ============================================================
// SQL CONSTANTS
// ============================================================

const ACCOUNTS_SQL: &str = r"
CREATE TABLE accounts (
    id UUID PRIMARY KEY,
    user_id UUID NOT NULL,
    balance NUMERIC(19, 4) NOT NULL DEFAULT 0,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),

    CONSTRAINT chk_accounts_balance_non_negative CHECK (balance >= 0)
);

CREATE INDEX idx_accounts_user ON accounts(user_id);
";

const DEPOSITS_SQL: &str = r"
CREATE TABLE deposits (
    id UUID PRIMARY KEY,
    user_id UUID NOT NULL,
    account_id UUID NOT NULL REFERENCES accounts(id),
    amount NUMERIC(19, 4) NOT NULL,
    method TEXT NOT NULL,
    status TEXT NOT NULL DEFAULT 'pending',
    reference_number TEXT NOT NULL,
    bank_name TEXT,
    account_number_last4 TEXT,
    notes TEXT,
    admin_notes TEXT,
    processed_by UUID,
    idempotency_key TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    processed_at TIMESTAMPTZ,

    CONSTRAINT uq_deposits_reference_number UNIQUE (reference_number),
    CONSTRAINT uq_deposits_user_idempotency_key UNIQUE (user_id, idempotency_key),
    CONSTRAINT chk_deposits_amount_positive CHECK (amount > 0),
    CONSTRAINT chk_deposits_method CHECK (method IN (
        'bank_transfer', 'wire', 'check', 'card', 'crypto', 'cash_courier'
    )),
    CONSTRAINT chk_deposits_status CHECK (status IN (
        'pending', 'processing', 'completed', 'failed', 'cancelled'
    ))
);
";

const WITHDRAWALS_SQL: &str = r"
CREATE TABLE withdrawals (
    id UUID PRIMARY KEY,
    user_id UUID NOT NULL,
    account_id UUID NOT NULL REFERENCES accounts(id),
    original_amount NUMERIC(19, 4) NOT NULL,
    modified_amount NUMERIC(19, 4),
    final_amount NUMERIC(19, 4),
    method TEXT NOT NULL,
    status TEXT NOT NULL DEFAULT 'pending_review',
    reference_number TEXT NOT NULL,
    bank_name TEXT,
    account_number_last4 TEXT,
    routing_number TEXT,
    email TEXT,
    crypto_address TEXT,
    crypto_currency TEXT,
    crypto_network TEXT,
    card_last4 TEXT,
    notes TEXT,
    admin_notes TEXT,
    reviewed_by UUID,
    reviewed_at TIMESTAMPTZ,
    rejection_reason TEXT,
    idempotency_key TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    processed_at TIMESTAMPTZ,

    CONSTRAINT uq_withdrawals_reference_number UNIQUE (reference_number),
    CONSTRAINT uq_withdrawals_user_idempotency_key UNIQUE (user_id, idempotency_key),
    CONSTRAINT chk_withdrawals_amount_positive CHECK (original_amount > 0),
    CONSTRAINT chk_withdrawals_modified_amount CHECK (
        modified_amount IS NULL
        OR (modified_amount > 0 AND modified_amount <= original_amount)
    ),
    CONSTRAINT chk_withdrawals_final_amount CHECK (
        final_amount IS NULL
        OR (final_amount > 0 AND final_amount <= original_amount)
    ),
    CONSTRAINT chk_withdrawals_method CHECK (method IN (
        'bank_transfer', 'wire', 'check', 'ach', 'paypal', 'venmo', 'crypto', 'debit_card'
    )),
    CONSTRAINT chk_withdrawals_status CHECK (status IN (
        'pending_review', 'approved', 'rejected', 'cancelled'
    )),
    CONSTRAINT chk_withdrawals_rejection_reason CHECK (rejection_reason IS NULL OR rejection_reason IN (
        'insufficient_verification', 'suspicious_activity', 'incorrect_details',
        'insufficient_funds', 'other'
    ))
);
";

const INDEXES_SQL: &str = r"
CREATE INDEX idx_deposits_user_created ON deposits(user_id, created_at DESC);
CREATE INDEX idx_deposits_status_created ON deposits(status, created_at);
CREATE INDEX idx_deposits_processed_at ON deposits(processed_at) WHERE processed_at IS NOT NULL;

CREATE INDEX idx_withdrawals_user_created ON withdrawals(user_id, created_at DESC);
CREATE INDEX idx_withdrawals_status_created ON withdrawals(status, created_at);
CREATE INDEX idx_withdrawals_processed_at ON withdrawals(processed_at) WHERE processed_at IS NOT NULL;
";

const DROP_ALL_SQL: &str = r"
DROP TABLE IF EXISTS withdrawals CASCADE;
DROP TABLE IF EXISTS deposits CASCADE;
DROP TABLE IF EXISTS accounts CASCADE;
";
