//! Behavioural scenarios for the bounded poller.

mod poll;
