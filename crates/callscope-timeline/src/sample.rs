//! Built-in demo call
//!
//! A seven minute sales call with fifteen transcript lines and five event
//! markers, served when no call directory is configured.

use crate::error::{TimelineError, TimelineResult};
use crate::provider::{CallDataProvider, CallSummary};
use async_trait::async_trait;
use callscope_core::{
    CallRecord, EventKind, EventMarker, Sentiment, Severity, Speaker, TranscriptLine,
};

/// Id of the demo call
pub const SAMPLE_CALL_ID: &str = "sample";

/// Length of the demo call in seconds
pub const SAMPLE_DURATION: f64 = 420.0;

/// Provider serving only the demo call
#[derive(Debug, Clone, Default)]
pub struct SampleCallProvider;

impl SampleCallProvider {
    /// Create a new sample provider
    pub const fn new() -> Self {
        Self
    }
}

/// The demo call record
pub fn sample_call() -> CallRecord {
    CallRecord {
        id: SAMPLE_CALL_ID.to_string(),
        title: Some("Acme Technologies - Enterprise Security".to_string()),
        total_duration: SAMPLE_DURATION,
        transcript: sample_transcript(),
        markers: sample_markers(),
    }
}

struct SampleLine {
    speaker: Speaker,
    timestamp: f64,
    duration: f64,
    sentiment: Sentiment,
    emotion: &'static str,
    text: &'static str,
    flag: Option<&'static str>,
}

const TRANSCRIPT: [SampleLine; 15] = [
    SampleLine {
        speaker: Speaker::Agent,
        timestamp: 0.0,
        duration: 5.0,
        sentiment: Sentiment::Positive,
        emotion: "professional",
        text: "Good morning, thank you for calling OTP Bank Sales. My name is Robert Parker. How may I assist you today?",
        flag: None,
    },
    SampleLine {
        speaker: Speaker::Customer,
        timestamp: 8.0,
        duration: 6.0,
        sentiment: Sentiment::Neutral,
        emotion: "interested",
        text: "Hi Robert, I'm Sarah Johnson from Acme Technologies. I'm interested in learning about your enterprise security solutions.",
        flag: None,
    },
    SampleLine {
        speaker: Speaker::Agent,
        timestamp: 16.0,
        duration: 7.0,
        sentiment: Sentiment::Positive,
        emotion: "helpful",
        text: "It's great to hear from you, Sarah. I'd be happy to help you explore our enterprise security offerings. Before we begin, may I verify your company email for our records?",
        flag: None,
    },
    SampleLine {
        speaker: Speaker::Customer,
        timestamp: 25.0,
        duration: 3.0,
        sentiment: Sentiment::Neutral,
        emotion: "neutral",
        text: "Sure, it's sarah.johnson@acmetech.com",
        flag: None,
    },
    SampleLine {
        speaker: Speaker::Agent,
        timestamp: 30.0,
        duration: 6.0,
        sentiment: Sentiment::Neutral,
        emotion: "inquisitive",
        text: "Thank you for that verification. Now, could you tell me a bit about your current security infrastructure and what specific challenges you're facing?",
        flag: None,
    },
    SampleLine {
        speaker: Speaker::Customer,
        timestamp: 40.0,
        duration: 9.0,
        sentiment: Sentiment::Negative,
        emotion: "frustrated",
        text: "Well, we're currently using a mix of on-premise and cloud solutions, but integration has been a real headache. We're also concerned about meeting SOC 2 compliance requirements.",
        flag: Some("Pain point identified"),
    },
    SampleLine {
        speaker: Speaker::Agent,
        timestamp: 52.0,
        duration: 10.0,
        sentiment: Sentiment::Positive,
        emotion: "empathetic",
        text: "I understand those integration challenges can be quite frustrating. Many of our enterprise clients have faced similar issues. The good news is our unified security platform is specifically designed to seamlessly integrate both on-premise and cloud environments.",
        flag: None,
    },
    SampleLine {
        speaker: Speaker::Customer,
        timestamp: 65.0,
        duration: 5.0,
        sentiment: Sentiment::Neutral,
        emotion: "concerned",
        text: "That sounds promising. But what about the compliance aspect? SOC 2 is critical for us.",
        flag: None,
    },
    SampleLine {
        speaker: Speaker::Agent,
        timestamp: 72.0,
        duration: 9.0,
        sentiment: Sentiment::Positive,
        emotion: "confident",
        text: "Absolutely, compliance is a top priority. Our platform is SOC 2 Type II certified and we provide comprehensive compliance reporting tools. We also offer dedicated support to help you maintain compliance standards.",
        flag: None,
    },
    SampleLine {
        speaker: Speaker::Customer,
        timestamp: 85.0,
        duration: 6.0,
        sentiment: Sentiment::Positive,
        emotion: "interested",
        text: "That's exactly what we need. What about implementation timelines? We're looking to have something in place within the next quarter.",
        flag: Some("Buying signal - timeline mentioned"),
    },
    SampleLine {
        speaker: Speaker::Agent,
        timestamp: 94.0,
        duration: 9.0,
        sentiment: Sentiment::Positive,
        emotion: "reassuring",
        text: "We can definitely work within that timeframe. Our typical enterprise implementation takes 4-6 weeks, including migration and training. We also offer a phased approach to minimize disruption to your operations.",
        flag: None,
    },
    SampleLine {
        speaker: Speaker::Customer,
        timestamp: 106.0,
        duration: 6.0,
        sentiment: Sentiment::Negative,
        emotion: "worried",
        text: "The phased approach sounds good, but I'm concerned about our team's ability to adapt. We have limited IT resources.",
        flag: None,
    },
    SampleLine {
        speaker: Speaker::Agent,
        timestamp: 115.0,
        duration: 9.0,
        sentiment: Sentiment::Positive,
        emotion: "supportive",
        text: "That's a valid concern, and we've designed our solution with ease of use in mind. We provide comprehensive training for your team, including hands-on workshops and 24/7 support during the transition period.",
        flag: None,
    },
    SampleLine {
        speaker: Speaker::Customer,
        timestamp: 127.0,
        duration: 4.0,
        sentiment: Sentiment::Negative,
        emotion: "concerned",
        text: "What about pricing? Our budget for this quarter is somewhat limited.",
        flag: Some("Budget constraint mentioned"),
    },
    SampleLine {
        speaker: Speaker::Agent,
        timestamp: 133.0,
        duration: 11.0,
        sentiment: Sentiment::Positive,
        emotion: "understanding",
        text: "I understand budget considerations are important. We offer flexible pricing models, including monthly subscriptions that can help spread the cost. Based on what you've shared about your needs, I can prepare a customized quote that maximizes value within your budget constraints.",
        flag: None,
    },
];

fn sample_transcript() -> Vec<TranscriptLine> {
    (1..)
        .zip(&TRANSCRIPT)
        .map(|(id, sample)| {
            let line = TranscriptLine::new(
                id,
                sample.speaker,
                sample.text,
                sample.timestamp,
                sample.duration,
            )
            .with_sentiment(sample.sentiment)
            .with_emotion(sample.emotion);
            match sample.flag {
                Some(reason) => line.flagged(reason),
                None => line,
            }
        })
        .collect()
}

fn sample_markers() -> Vec<EventMarker> {
    vec![
        EventMarker::new(1, EventKind::DeadAir, 36.0)
            .with_duration(4.0)
            .with_description("4 seconds of silence detected")
            .with_severity(Severity::Medium),
        EventMarker::new(2, EventKind::Objection, 106.0)
            .with_duration(6.0)
            .with_description("Concern about team adaptation")
            .with_severity(Severity::High),
        EventMarker::new(3, EventKind::BudgetConcern, 127.0)
            .with_duration(4.0)
            .with_description("Customer mentioned limited budget")
            .with_severity(Severity::High),
        EventMarker::new(4, EventKind::KeyPoint, 85.0)
            .with_duration(6.0)
            .with_label("Buying Signal")
            .with_description("Customer mentioned implementation timeline")
            .with_severity(Severity::High),
        EventMarker::new(5, EventKind::Interruption, 60.0)
            .with_duration(2.0)
            .with_description("Agent interrupted customer")
            .with_severity(Severity::Low),
    ]
}

#[async_trait]
impl CallDataProvider for SampleCallProvider {
    async fn load_call(&self, call_id: &str) -> TimelineResult<CallRecord> {
        if call_id == SAMPLE_CALL_ID {
            Ok(sample_call())
        } else {
            Err(TimelineError::call_not_found(call_id))
        }
    }

    async fn list_calls(&self) -> TimelineResult<Vec<CallSummary>> {
        Ok(vec![CallSummary::from(&sample_call())])
    }

    fn name(&self) -> &str {
        "sample"
    }
}
