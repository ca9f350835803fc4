#![cfg(test)]

mod marketplace;
mod mocks;
