use std::collections::HashSet;
use std::path::Path;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::{debug, info};

use crate::error::{ChatError, ChatResult};
use crate::models::{Message, NewRoom, NewUser, Room, User};
use crate::store::Store;
use crate::subscription::{ChangeHub, Subscription, Topic};
use crate::utils::now_millis;

const SCHEMA: &str = "
    -- Users (one document per signed-in identity)
    CREATE TABLE IF NOT EXISTS users (
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        email TEXT NOT NULL,
        avatar_url TEXT,
        contacts TEXT NOT NULL DEFAULT '[]',
        created_at INTEGER NOT NULL
    );

    -- Rooms (direct and group)
    CREATE TABLE IF NOT EXISTS rooms (
        id TEXT PRIMARY KEY,
        name TEXT,
        icon_url TEXT,
        last_updated INTEGER NOT NULL,
        created_at INTEGER NOT NULL
    );

    -- Room members
    CREATE TABLE IF NOT EXISTS room_members (
        room_id TEXT NOT NULL REFERENCES rooms(id),
        user_id TEXT NOT NULL,
        position INTEGER NOT NULL,
        PRIMARY KEY (room_id, user_id)
    );

    -- Messages
    CREATE TABLE IF NOT EXISTS messages (
        id TEXT PRIMARY KEY,
        room_id TEXT NOT NULL REFERENCES rooms(id),
        sender_id TEXT NOT NULL,
        content TEXT NOT NULL,
        created_at INTEGER NOT NULL
    );

    CREATE INDEX IF NOT EXISTS idx_users_email ON users(lower(email));
    CREATE INDEX IF NOT EXISTS idx_room_members_user_id ON room_members(user_id);
    CREATE INDEX IF NOT EXISTS idx_rooms_last_updated ON rooms(last_updated);
    CREATE INDEX IF NOT EXISTS idx_messages_room_created ON messages(room_id, created_at);
";

const USER_COLUMNS: &str = "id, name, email, avatar_url, contacts, created_at";
const ROOM_COLUMNS: &str = "r.id, r.name, r.icon_url, r.last_updated, r.created_at";

/// SQLite-backed store
pub struct Database {
    conn: Mutex<Connection>,
    hub: Arc<ChangeHub>,
    /// Last timestamp handed out, so store timestamps never repeat or go backwards
    last_timestamp: AtomicI64,
}

impl Database {
    pub fn open(path: impl AsRef<Path>) -> ChatResult<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        info!(path = %path.display(), "Opened database");
        Self::init(conn)
    }

    pub fn open_in_memory() -> ChatResult<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> ChatResult<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        conn.execute_batch(SCHEMA)?;

        let last_timestamp: i64 = conn.query_row(
            "SELECT MAX(COALESCE((SELECT MAX(created_at) FROM messages), 0),
                        COALESCE((SELECT MAX(last_updated) FROM rooms), 0),
                        COALESCE((SELECT MAX(created_at) FROM users), 0))",
            [],
            |row| row.get(0),
        )?;

        Ok(Self {
            conn: Mutex::new(conn),
            hub: Arc::new(ChangeHub::new()),
            last_timestamp: AtomicI64::new(last_timestamp),
        })
    }

    pub fn hub(&self) -> &Arc<ChangeHub> {
        &self.hub
    }

    fn lock(&self) -> ChatResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| ChatError::Poisoned)
    }

    /// Store-assigned timestamp: wall clock, bumped past the previous one if needed
    fn next_timestamp(&self) -> i64 {
        let now = now_millis();
        let prev = self
            .last_timestamp
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                Some(now.max(last + 1))
            })
            .unwrap_or(now);
        now.max(prev + 1)
    }

    fn publish(&self, topics: &[Topic]) {
        for topic in topics {
            self.hub.publish(topic);
        }
    }
}

fn contacts_from_json(raw: &str) -> rusqlite::Result<Vec<String>> {
    serde_json::from_str(raw).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(4, rusqlite::types::Type::Text, Box::new(e))
    })
}

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<User> {
    let contacts: String = row.get(4)?;
    Ok(User {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        avatar_url: row.get(3)?,
        contacts: contacts_from_json(&contacts)?,
        created_at: row.get(5)?,
    })
}

fn room_from_row(row: &Row<'_>) -> rusqlite::Result<Room> {
    Ok(Room {
        id: row.get(0)?,
        name: row.get(1)?,
        icon_url: row.get(2)?,
        members: Vec::new(),
        last_updated: row.get(3)?,
        created_at: row.get(4)?,
    })
}

fn message_from_row(row: &Row<'_>) -> rusqlite::Result<Message> {
    Ok(Message {
        id: row.get(0)?,
        room_id: row.get(1)?,
        sender_id: row.get(2)?,
        content: row.get(3)?,
        created_at: row.get(4)?,
    })
}

fn load_members(conn: &Connection, room_id: &str) -> rusqlite::Result<Vec<String>> {
    let mut stmt = conn.prepare_cached(
        "SELECT user_id FROM room_members WHERE room_id = ?1 ORDER BY position",
    )?;
    let members = stmt
        .query_map([room_id], |row| row.get(0))?
        .collect::<rusqlite::Result<Vec<String>>>()?;
    Ok(members)
}

fn query_user(conn: &Connection, user_id: &str) -> rusqlite::Result<Option<User>> {
    conn.query_row(
        &format!("SELECT {} FROM users WHERE id = ?1", USER_COLUMNS),
        [user_id],
        user_from_row,
    )
    .optional()
}

fn query_room(conn: &Connection, room_id: &str) -> rusqlite::Result<Option<Room>> {
    let room = conn
        .query_row(
            &format!("SELECT {} FROM rooms r WHERE r.id = ?1", ROOM_COLUMNS),
            [room_id],
            room_from_row,
        )
        .optional()?;

    match room {
        Some(mut room) => {
            room.members = load_members(conn, &room.id)?;
            Ok(Some(room))
        }
        None => Ok(None),
    }
}

fn query_rooms(
    conn: &Connection,
    sql: &str,
    params: impl rusqlite::Params,
) -> rusqlite::Result<Vec<Room>> {
    let mut stmt = conn.prepare(sql)?;
    let mut rooms = stmt
        .query_map(params, room_from_row)?
        .collect::<rusqlite::Result<Vec<Room>>>()?;
    for room in &mut rooms {
        room.members = load_members(conn, &room.id)?;
    }
    Ok(rooms)
}

fn check_members(members: &[String]) -> ChatResult<()> {
    if members.len() < 2 {
        return Err(ChatError::InvalidRoom(
            "a room needs at least two members".to_string(),
        ));
    }
    let mut seen = HashSet::new();
    if let Some(dup) = members.iter().find(|m| !seen.insert(m.as_str())) {
        return Err(ChatError::InvalidRoom(format!("duplicate member {}", dup)));
    }
    Ok(())
}

#[async_trait]
impl Store for Database {
    async fn get_user(&self, user_id: &str) -> ChatResult<Option<User>> {
        let conn = self.lock()?;
        Ok(query_user(&conn, user_id)?)
    }

    async fn find_user_by_email(&self, email: &str) -> ChatResult<Option<User>> {
        let conn = self.lock()?;
        let user = conn
            .query_row(
                &format!(
                    "SELECT {} FROM users WHERE lower(email) = lower(?1) LIMIT 1",
                    USER_COLUMNS
                ),
                [email.trim()],
                user_from_row,
            )
            .optional()?;
        Ok(user)
    }

    async fn create_user(&self, user_id: &str, profile: NewUser) -> ChatResult<User> {
        let now = self.next_timestamp();
        let (user, created) = {
            let conn = self.lock()?;
            let inserted = conn.execute(
                "INSERT OR IGNORE INTO users (id, name, email, avatar_url, contacts, created_at)
                 VALUES (?1, ?2, ?3, ?4, '[]', ?5)",
                params![user_id, profile.name, profile.email, profile.avatar_url, now],
            )?;
            let user = query_user(&conn, user_id)?
                .ok_or_else(|| ChatError::not_found(format!("User {}", user_id)))?;
            (user, inserted > 0)
        };

        if created {
            info!(user_id = %user_id, "Created user profile");
            self.publish(&[Topic::User(user_id.to_string())]);
        }
        Ok(user)
    }

    async fn update_user_contacts(&self, user_id: &str, contacts: &[String]) -> ChatResult<()> {
        let encoded = serde_json::to_string(contacts)?;
        {
            let conn = self.lock()?;
            let updated = conn.execute(
                "UPDATE users SET contacts = ?1 WHERE id = ?2",
                params![encoded, user_id],
            )?;
            if updated == 0 {
                return Err(ChatError::not_found(format!("User {}", user_id)));
            }
        }

        self.publish(&[Topic::User(user_id.to_string())]);
        Ok(())
    }

    async fn get_room(&self, room_id: &str) -> ChatResult<Option<Room>> {
        let conn = self.lock()?;
        Ok(query_room(&conn, room_id)?)
    }

    async fn rooms_containing(&self, user_id: &str) -> ChatResult<Vec<Room>> {
        let conn = self.lock()?;
        let rooms = query_rooms(
            &conn,
            &format!(
                "SELECT {} FROM rooms r
                 JOIN room_members m ON m.room_id = r.id
                 WHERE m.user_id = ?1
                 ORDER BY r.last_updated DESC, r.rowid DESC",
                ROOM_COLUMNS
            ),
            [user_id],
        )?;
        debug!(user_id = %user_id, count = rooms.len(), "Fetched rooms");
        Ok(rooms)
    }

    async fn direct_rooms_between(&self, user_a: &str, user_b: &str) -> ChatResult<Vec<Room>> {
        let conn = self.lock()?;
        let rooms = query_rooms(
            &conn,
            &format!(
                "SELECT {} FROM rooms r
                 WHERE (SELECT COUNT(*) FROM room_members c WHERE c.room_id = r.id) = 2
                   AND EXISTS (SELECT 1 FROM room_members a WHERE a.room_id = r.id AND a.user_id = ?1)
                   AND EXISTS (SELECT 1 FROM room_members b WHERE b.room_id = r.id AND b.user_id = ?2)
                 ORDER BY r.last_updated DESC, r.rowid DESC",
                ROOM_COLUMNS
            ),
            [user_a, user_b],
        )?;
        Ok(rooms)
    }

    async fn create_room(&self, room_id: &str, room: NewRoom) -> ChatResult<Room> {
        check_members(&room.members)?;
        let now = self.next_timestamp();

        let (stored, created) = {
            let mut conn = self.lock()?;
            let tx = conn.transaction()?;
            let inserted = tx.execute(
                "INSERT OR IGNORE INTO rooms (id, name, icon_url, last_updated, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![room_id, room.name, room.icon_url, now, now],
            )?;
            if inserted > 0 {
                for (position, member) in room.members.iter().enumerate() {
                    tx.execute(
                        "INSERT INTO room_members (room_id, user_id, position) VALUES (?1, ?2, ?3)",
                        params![room_id, member, position as i64],
                    )?;
                }
            }
            tx.commit()?;

            let stored = query_room(&conn, room_id)?
                .ok_or_else(|| ChatError::not_found(format!("Room {}", room_id)))?;
            (stored, inserted > 0)
        };

        if created {
            info!(room_id = %room_id, members = stored.members.len(), "Created room");
            let mut topics = vec![Topic::Room(room_id.to_string())];
            topics.extend(stored.members.iter().map(|m| Topic::RoomsOf(m.clone())));
            self.publish(&topics);
        } else {
            debug!(room_id = %room_id, "Room already exists");
        }
        Ok(stored)
    }

    async fn messages_of(&self, room_id: &str, limit: Option<usize>) -> ChatResult<Vec<Message>> {
        let conn = self.lock()?;
        let limit = limit.map(|l| l as i64).unwrap_or(-1);
        let mut stmt = conn.prepare(
            "SELECT id, room_id, sender_id, content, created_at
             FROM messages
             WHERE room_id = ?1
             ORDER BY created_at DESC, rowid DESC
             LIMIT ?2",
        )?;
        let messages = stmt
            .query_map(params![room_id, limit], message_from_row)?
            .collect::<rusqlite::Result<Vec<Message>>>()?;
        Ok(messages)
    }

    async fn create_message(
        &self,
        room_id: &str,
        sender_id: &str,
        content: &str,
    ) -> ChatResult<Message> {
        let now = self.next_timestamp();
        let message = Message {
            id: uuid::Uuid::new_v4().to_string(),
            room_id: room_id.to_string(),
            sender_id: sender_id.to_string(),
            content: content.to_string(),
            created_at: now,
        };

        let members = {
            let mut conn = self.lock()?;
            let tx = conn.transaction()?;
            let updated = tx.execute(
                "UPDATE rooms SET last_updated = ?1 WHERE id = ?2",
                params![now, room_id],
            )?;
            if updated == 0 {
                return Err(ChatError::not_found(format!("Room {}", room_id)));
            }
            tx.execute(
                "INSERT INTO messages (id, room_id, sender_id, content, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![message.id, message.room_id, message.sender_id, message.content, now],
            )?;
            tx.commit()?;
            load_members(&conn, room_id)?
        };

        let mut topics = vec![
            Topic::Messages(room_id.to_string()),
            Topic::Room(room_id.to_string()),
        ];
        topics.extend(members.into_iter().map(Topic::RoomsOf));
        self.publish(&topics);

        Ok(message)
    }

    fn subscribe(&self, topics: Vec<Topic>) -> Subscription {
        self.hub.subscribe(topics)
    }
}
