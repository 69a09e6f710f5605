//! Outbound mail queue. Messages go over an mpsc channel to a listener task
//! that currently only logs them.

use serde::Serialize;
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::config::MailConfig;
use crate::domain::CommittedReservation;
use crate::models::format_date;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MailData {
    pub to: String,
    pub from: String,
    pub subject: String,
    pub content: String,
}

#[derive(Clone)]
pub struct Mailer {
    sender: Option<mpsc::Sender<MailData>>,
    from_address: String,
    owner_address: String,
}

impl Mailer {
    /// Spawns the listener and returns a handle to its queue.
    /// With mail disabled the handle drops every message.
    #[must_use]
    pub fn start(config: &MailConfig) -> Self {
        if !config.enabled {
            info!("Mail disabled, outgoing messages will be dropped");
            return Self::from_sender(None, config);
        }

        let (sender, receiver) = mpsc::channel(config.queue_size.max(1));
        tokio::spawn(listen(receiver));
        Self::from_sender(Some(sender), config)
    }

    /// A mailer whose queue is handed back to the caller instead of a listener.
    #[must_use]
    pub fn channel(config: &MailConfig) -> (Self, mpsc::Receiver<MailData>) {
        let (sender, receiver) = mpsc::channel(config.queue_size.max(1));
        (Self::from_sender(Some(sender), config), receiver)
    }

    fn from_sender(sender: Option<mpsc::Sender<MailData>>, config: &MailConfig) -> Self {
        Self {
            sender,
            from_address: config.from_address.clone(),
            owner_address: config.owner_address.clone(),
        }
    }

    /// Queues a message. Never fails the caller; a full or closed queue is logged.
    pub fn send(&self, mail: MailData) {
        let Some(sender) = &self.sender else {
            return;
        };

        if let Err(e) = sender.try_send(mail) {
            warn!(error = %e, "Failed to queue mail");
        }
    }

    /// Queues the guest confirmation and the owner notification.
    pub fn reservation_confirmed(&self, reservation: &CommittedReservation) {
        self.send(guest_confirmation(reservation, &self.from_address));
        self.send(owner_notification(
            reservation,
            &self.from_address,
            &self.owner_address,
        ));
    }
}

async fn listen(mut receiver: mpsc::Receiver<MailData>) {
    while let Some(mail) = receiver.recv().await {
        info!(
            to = %mail.to,
            from = %mail.from,
            subject = %mail.subject,
            bytes = mail.content.len(),
            "Mail sent"
        );
    }
    info!("Mail queue closed");
}

fn guest_confirmation(reservation: &CommittedReservation, from: &str) -> MailData {
    let content = format!(
        "<strong>Reservation Confirmation</strong><br>\
         Dear {}:<br>\
         This is to confirm your reservation in the {} from {} to {}.",
        reservation.guest.first_name,
        reservation.room.room_name,
        format_date(reservation.start_date),
        format_date(reservation.end_date),
    );

    MailData {
        to: reservation.guest.email.clone(),
        from: from.to_string(),
        subject: "Reservation Confirmation".to_string(),
        content,
    }
}

fn owner_notification(reservation: &CommittedReservation, from: &str, owner: &str) -> MailData {
    let content = format!(
        "<strong>Reservation Notification</strong><br>\
         A reservation has been made for {} from {} to {} by {} {} ({}).",
        reservation.room.room_name,
        format_date(reservation.start_date),
        format_date(reservation.end_date),
        reservation.guest.first_name,
        reservation.guest.last_name,
        reservation.guest.email,
    );

    MailData {
        to: owner.to_string(),
        from: from.to_string(),
        subject: "Reservation Notification".to_string(),
        content,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GuestDetails, Room};
    use chrono::NaiveDate;

    fn committed() -> CommittedReservation {
        CommittedReservation {
            id: 7,
            room: Room {
                id: 1,
                room_name: "General's Quarters".to_string(),
            },
            guest: GuestDetails {
                first_name: "John".to_string(),
                last_name: "Smith".to_string(),
                email: "john@test.com".to_string(),
                phone: String::new(),
            },
            start_date: NaiveDate::from_ymd_opt(2050, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2050, 1, 2).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_confirmation_queues_guest_and_owner_mail() {
        let (mailer, mut receiver) = Mailer::channel(&MailConfig::default());
        mailer.reservation_confirmed(&committed());

        let guest = receiver.recv().await.unwrap();
        assert_eq!(guest.to, "john@test.com");
        assert!(guest.content.contains("2050-01-01"));

        let owner = receiver.recv().await.unwrap();
        assert_eq!(owner.to, "me@here.com");
        assert!(owner.content.contains("John Smith"));
    }

    #[tokio::test]
    async fn test_closed_queue_does_not_panic() {
        let (mailer, receiver) = Mailer::channel(&MailConfig::default());
        drop(receiver);
        mailer.reservation_confirmed(&committed());
    }
}
