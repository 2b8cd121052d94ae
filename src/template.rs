// src/template.rs
// Embedded fallback payload, shown when neither an upload result nor the
// service's template data is available.

use crate::models::{AnalysisResult, MindmapData, SourceNode};

const EMBEDDED_SUMMARY: &str = "# AI Summary: ChatGPT Prompt Engineering for Developers - Introduction

## Summary

This video introduces a course on ChatGPT prompt engineering for developers. It shows how to use the API of a large language model (LLM) to build software applications quickly, with a focus on best practices for instruction-tuned LLMs. The course covers prompting techniques for software development, common use cases such as summarizing, inferring, transforming and expanding, and building a chatbot.

### Highlights

- 💡 The potential of LLMs as a developer tool is underestimated; calling an LLM through its API makes it fast to build software applications. #LLM #API #SoftwareDevelopment
- 📚 Base LLMs differ from instruction-tuned LLMs; the latter are trained to follow instructions, are safer and more reliable, and are the mainstream choice for real applications. #BaseLLM #InstructionTunedLLM #RLHF
- 🎯 Instruction-tuned LLMs aim for helpful, honest and harmless output, which lowers the chance of harmful text. #Helpful #Honest #Harmless
- ✍ Clear and specific instructions are essential, much like briefing a smart person who does not know the details of the task. #ClearInstructions #SpecificInstructions #Prompting
- 🧠 Spelling out focus, tone and reference material noticeably improves the quality of the result. #Tone #Context #ReferenceMaterial

#ChatGPT #PromptEngineering #DeepLearning

### Questions

- How do you choose between a base LLM and an instruction-tuned LLM for a given task?
- How do you evaluate and improve the quality of LLM-generated text in practice?";

fn branch(label: &str, leaves: &[&str]) -> SourceNode {
    SourceNode::with_text(label).with_children(leaves.iter().map(|leaf| SourceNode::with_text(leaf)).collect())
}

pub fn embedded_mindmap() -> MindmapData {
    MindmapData::new(SourceNode::with_text("ChatGPT Prompt Engineering").with_children(vec![
        branch(
            "Core concepts",
            &[
                "💡 Prompt engineering for developers",
                "💡 Building LLM apps fast",
                "💡 Instruction-tuned LLMs",
            ],
        ),
        branch(
            "Practical techniques",
            &["💡 Instruction-tuned language models", "🎯 Instruction tuning: the default for apps"],
        ),
        branch(
            "Use cases",
            &["💡 Clarity of instructions first", "💡 Essentials of prompt wording"],
        ),
    ]))
}

/// Summary and mind map compiled into the client.
pub fn embedded_payload() -> AnalysisResult {
    AnalysisResult {
        summary: EMBEDDED_SUMMARY.to_string(),
        mindmap: Some(embedded_mindmap()),
        xmind_path: None,
        video_path: None,
    }
}
