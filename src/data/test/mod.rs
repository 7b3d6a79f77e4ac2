mod attendance_session;
mod open_session;
