//! Server-side Lua for multi-step cache maintenance.
//!
//! Both scripts walk the LRU index and delete entry hashes in one
//! atomic evaluation, so no client command can interleave between the
//! reads and the removals.

/// Removes the `ARGV[1] + 1` lowest-scored members of the LRU index
/// together with their entry hashes. Returns the number of members
/// removed.
pub const EVICT_LRU: &str = r#"
local keys = redis.call('ZRANGE', 'lru', 0, ARGV[1])
for i, key in ipairs(keys) do
  redis.call('DEL', 'entries:'..key)
  redis.call('ZREM', 'lru', key)
end
return #keys
"#;

/// Deletes every entry whose `last_updated + ttl` lies before `ARGV[1]`
/// (unix seconds), removing it from both keyspaces. Returns the number
/// of members walked.
pub const SWEEP_EXPIRED: &str = r#"
local keys = redis.call('ZRANGE', 'lru', 0, -1)
for i, key in ipairs(keys) do
  local ttl = redis.call('HGET', 'entries:'..key, 'ttl')
  local updated = redis.call('HGET', 'entries:'..key, 'last_updated')
  if ttl and updated and tonumber(updated) + tonumber(ttl) < tonumber(ARGV[1]) then
    redis.call('DEL', 'entries:'..key)
    redis.call('ZREM', 'lru', key)
  end
end
return #keys
"#;
