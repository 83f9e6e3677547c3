/// Status lines this server sends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ok,
    Created,
    NotFound,
}

impl Status {
    pub fn line(&self) -> &'static str {
        match self {
            Status::Ok => "HTTP/1.1 200 OK",
            Status::Created => "HTTP/1.1 201 Created",
            Status::NotFound => "HTTP/1.1 404 Not Found",
        }
    }

    pub fn code(&self) -> u16 {
        match self {
            Status::Ok => 200,
            Status::Created => 201,
            Status::NotFound => 404,
        }
    }
}
