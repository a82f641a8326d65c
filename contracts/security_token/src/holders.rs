//! Insertion-ordered holder set kept as a doubly linked list in storage.
//! Insert and unlink are O(1); iteration walks head to tail.

use soroban_sdk::{Address, Env, Vec};

use crate::storage::{DataKey, HolderLink};

pub fn contains(env: &Env, holder: &Address) -> bool {
    env.storage()
        .persistent()
        .has(&DataKey::HolderLink(holder.clone()))
}

pub fn count(env: &Env) -> u32 {
    env.storage()
        .instance()
        .get::<DataKey, u32>(&DataKey::HolderCount)
        .unwrap_or(0)
}

/// Append `holder` at the tail. No-op when already present.
pub fn insert(env: &Env, holder: &Address) {
    if contains(env, holder) {
        return;
    }

    let tail: Option<Address> = env.storage().instance().get(&DataKey::HolderTail);

    match &tail {
        Some(tail) => {
            let mut link = read_link(env, tail);
            link.next = Some(holder.clone());
            write_link(env, tail, &link);
        }
        None => {
            env.storage().instance().set(&DataKey::HolderHead, holder);
        }
    }

    write_link(
        env,
        holder,
        &HolderLink {
            prev: tail,
            next: None,
        },
    );
    env.storage().instance().set(&DataKey::HolderTail, holder);
    env.storage()
        .instance()
        .set(&DataKey::HolderCount, &(count(env) + 1));
}

/// Unlink `holder`. No-op when absent.
pub fn remove(env: &Env, holder: &Address) {
    if !contains(env, holder) {
        return;
    }

    let link = read_link(env, holder);

    match &link.prev {
        Some(prev) => {
            let mut prev_link = read_link(env, prev);
            prev_link.next = link.next.clone();
            write_link(env, prev, &prev_link);
        }
        None => set_or_clear(env, DataKey::HolderHead, &link.next),
    }

    match &link.next {
        Some(next) => {
            let mut next_link = read_link(env, next);
            next_link.prev = link.prev.clone();
            write_link(env, next, &next_link);
        }
        None => set_or_clear(env, DataKey::HolderTail, &link.prev),
    }

    env.storage()
        .persistent()
        .remove(&DataKey::HolderLink(holder.clone()));
    env.storage()
        .instance()
        .set(&DataKey::HolderCount, &count(env).saturating_sub(1));
}

pub fn list(env: &Env) -> Vec<Address> {
    let mut out = Vec::new(env);
    let mut cursor: Option<Address> = env.storage().instance().get(&DataKey::HolderHead);
    while let Some(holder) = cursor {
        cursor = read_link(env, &holder).next;
        out.push_back(holder);
    }
    out
}

fn read_link(env: &Env, holder: &Address) -> HolderLink {
    env.storage()
        .persistent()
        .get(&DataKey::HolderLink(holder.clone()))
        .unwrap_or(HolderLink {
            prev: None,
            next: None,
        })
}

fn write_link(env: &Env, holder: &Address, link: &HolderLink) {
    env.storage()
        .persistent()
        .set(&DataKey::HolderLink(holder.clone()), link);
}

fn set_or_clear(env: &Env, key: DataKey, value: &Option<Address>) {
    match value {
        Some(address) => env.storage().instance().set(&key, address),
        None => env.storage().instance().remove(&key),
    }
}
